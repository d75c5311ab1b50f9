use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::stateless_llm_interface::StatelessLLMInterface;
use crate::errors::LLMError;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// OpenAI compatible LLM implementation
/// Talks to any `/chat/completions` endpoint (DeepSeek, OpenAI, Groq, ...)
pub struct OpenAICompatibleLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAICompatibleLLM {
    pub fn new(
        model: String,
        base_url: String,
        api_key: String,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, LLMError> {
        info!(
            "Initialized OpenAICompatibleLLM: model={}, base_url={}",
            model, base_url
        );
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            temperature,
            max_tokens,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Pull `choices[0].message.content` out of a completion response
fn message_content(body: &serde_json::Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending completion request: prompt_chars={}", prompt.chars().count());
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let content = message_content(&body).ok_or(LLMError::MalformedResponse)?;
        debug!("Received completion: chars={}", content.chars().count());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn llm(base_url: String) -> OpenAICompatibleLLM {
        OpenAICompatibleLLM::new(
            "deepseek-chat".to_string(),
            base_url,
            "test-key".to_string(),
            0.3,
            8000,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn message_content_reads_first_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        assert_eq!(message_content(&body).as_deref(), Some("hi"));
        assert_eq!(message_content(&json!({"choices": []})), None);
    }

    #[tokio::test]
    async fn complete_sends_prompt_and_returns_content() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(body["model"], "deepseek-chat");
                assert_eq!(body["max_tokens"], 8000);
                let prompt = body["messages"][0]["content"].as_str().unwrap_or("").to_string();
                Json(json!({"choices": [{"message": {"content": format!("echo: {prompt}")}}]}))
            }),
        );
        let base_url = spawn_upstream(router).await;

        let out = llm(base_url).complete("hello").await.unwrap();
        assert_eq!(out, "echo: hello");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let base_url = spawn_upstream(router).await;

        let err = llm(base_url).complete("hello").await.unwrap_err();
        match err {
            LLMError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_content_is_malformed() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let base_url = spawn_upstream(router).await;

        let err = llm(base_url).complete("hello").await.unwrap_err();
        assert!(matches!(err, LLMError::MalformedResponse));
    }
}
