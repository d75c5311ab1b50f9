use async_trait::async_trait;

use crate::errors::LLMError;

/// Interface for a stateless language model
/// Each call is a single prompt with no conversation memory
#[async_trait]
pub trait StatelessLLMInterface: Send + Sync {
    /// Send one user prompt and return the full response text
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;
}
