use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::document::docx::DOCX_MIME;
use crate::errors::ApiError;
use crate::state::AppState;
use crate::translate::VocabularyEntry;

const SERVICE_NAME: &str = "Intelligent Translation API";

/// Full application: API routes, downloads, static files and layers
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;
    let download_route = format!(
        "{}/:filename",
        system_config.download_route_prefix.trim_end_matches('/')
    );

    Router::new()
        .route("/api/v1/translate", post(translate))
        .route(&download_route, get(download_document))
        .route("/api/health", get(health_check))
        .fallback_service(ServeDir::new(system_config.static_path()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Document,
}

impl OutputFormat {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("document") | Some("word") | Some("docx") => OutputFormat::Document,
            _ => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Serialize)]
struct TranslateResponse {
    success: bool,
    original_text: String,
    translation: String,
    vocabulary: Vec<VocabularyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_document_url: Option<String>,
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let text = payload
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or(ApiError::MissingText)?
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(ApiError::EmptyText);
    }

    let output_format = OutputFormat::parse(payload.get("output_format").and_then(|v| v.as_str()));
    let include_vocabulary = payload
        .get("include_vocabulary")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);

    let result = state.translator.translate(&text).await?;

    let word_document_url = match output_format {
        OutputFormat::Document => {
            let renderer = state.renderer.clone();
            let original = text.clone();
            let rendered_result = result.clone();
            let document = tokio::task::spawn_blocking(move || {
                renderer.render(&original, &rendered_result, include_vocabulary)
            })
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;
            Some(document.url)
        }
        OutputFormat::Json => None,
    };

    info!(
        "Translate request done: format={:?}, include_vocabulary={}",
        output_format, include_vocabulary
    );

    Ok(Json(TranslateResponse {
        success: true,
        original_text: text,
        translation: result.translation,
        vocabulary: if include_vocabulary {
            result.vocabulary
        } else {
            Vec::new()
        },
        word_document_url,
    }))
}

async fn download_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let name = filename.clone();
    let bytes = tokio::task::spawn_blocking(move || store.load(&name))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "service": SERVICE_NAME
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::translate::service::tests::StubLLM;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const MODEL_REPLY: &str = "Here is the result:\n{\"translation\": \"你好世界\", \"vocabulary\": [{\"english\": \"hello\", \"chinese\": \"你好\", \"explanation\": \"greeting\"}]}\nThanks";

    fn test_app(dir: &std::path::Path, llm: StubLLM) -> Router {
        let mut config = Config::default();
        config.system_config.downloads_dir = dir.join("downloads").to_string_lossy().into_owned();
        config.system_config.static_dir = dir.join("static").to_string_lossy().into_owned();
        build_app(AppState::with_llm(config, Arc::new(llm)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn translate_returns_json_result() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "  Hello world  ", "output_format": "json", "include_vocabulary": true}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["original_text"], "Hello world");
        assert_eq!(body["translation"], "你好世界");
        assert_eq!(
            body["vocabulary"],
            json!([{"english": "hello", "chinese": "你好", "explanation": "greeting"}])
        );
        assert!(body.get("word_document_url").is_none());
    }

    #[tokio::test]
    async fn vocabulary_omitted_when_not_requested() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "Hello world", "include_vocabulary": false}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["vocabulary"], json!([]));
        assert_eq!(body["translation"], "你好世界");
    }

    #[tokio::test]
    async fn malformed_model_output_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying("Sorry, I could not process this."));

        let response = app
            .oneshot(post_json("/api/v1/translate", json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["translation"], crate::translate::FALLBACK_TRANSLATION);
        assert_eq!(body["vocabulary"], json!([]));
    }

    #[tokio::test]
    async fn missing_text_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app
            .oneshot(post_json("/api/v1/translate", json!({"output_format": "json"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn blank_text_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app
            .oneshot(post_json("/api/v1/translate", json!({"text": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn invalid_json_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/translate")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::failing());

        let response = app
            .oneshot(post_json("/api/v1/translate", json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn document_output_can_be_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "Hello world", "output_format": "word"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let url = body["word_document_url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/downloads/translation_"));

        let filename = url.trim_start_matches("/downloads/");
        let on_disk = std::fs::read(dir.path().join("downloads").join(filename)).unwrap();

        let response = app.oneshot(get(&url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], DOCX_MIME);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(filename));
        assert_eq!(body_bytes(response).await, on_disk);
    }

    #[tokio::test]
    async fn document_format_alias_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app
            .oneshot(post_json(
                "/api/v1/translate",
                json!({"text": "Hello world", "output_format": "document", "include_vocabulary": false}),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert!(body["word_document_url"].is_string());
        assert_eq!(body["vocabulary"], json!([]));
    }

    #[tokio::test]
    async fn unknown_download_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app.oneshot(get("/downloads/nothing.docx")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn static_index_is_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/index.html"), "<h1>translate</h1>").unwrap();
        let app = test_app(dir.path(), StubLLM::replying(MODEL_REPLY));

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<h1>translate</h1>");
    }
}
