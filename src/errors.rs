use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures of the document content store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid document name: {0}")]
    InvalidName(String),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("failed to write document {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read document {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the upstream generation call
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("request to language model failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("language model returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("language model response had no message content")]
    MalformedResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing required field: text")]
    MissingText,
    #[error("text must not be empty")]
    EmptyText,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("translation service failed: {0}")]
    Upstream(#[from] LLMError),
    #[error("processing failed: {0}")]
    Storage(StoreError),
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("processing failed: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) | StoreError::InvalidName(name) => ApiError::NotFound(name),
            other => ApiError::Storage(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingText | ApiError::EmptyText | ApiError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string()
            })),
        )
            .into_response()
    }
}
