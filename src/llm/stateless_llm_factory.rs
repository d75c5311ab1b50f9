use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use anyhow::Result;

use crate::config::LLMConfig;
use crate::llm::StatelessLLMInterface;
use crate::llm::openai_compatible_llm::OpenAICompatibleLLM;

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create an LLM based on the configured provider.
    ///
    /// Every supported provider speaks the OpenAI chat completion protocol,
    /// they differ only in base URL and model name.
    pub fn create_llm(config: &LLMConfig) -> Result<Arc<dyn StatelessLLMInterface>> {
        info!("Initializing LLM: {}", config.llm_provider);

        match config.llm_provider.as_str() {
            "openai_compatible_llm" | "openai_llm" | "gemini_llm" | "zhipu_llm"
            | "deepseek_llm" | "groq_llm" | "mistral_llm" => {
                if config.llm_api_key.is_empty() {
                    tracing::warn!("No API key configured for {}", config.llm_provider);
                }
                Ok(Arc::new(OpenAICompatibleLLM::new(
                    config.model.clone(),
                    config.base_url.clone(),
                    config.llm_api_key.clone(),
                    config.temperature,
                    config.max_tokens,
                    Duration::from_secs(config.timeout_secs),
                )?))
            }
            _ => Err(anyhow::anyhow!("Unsupported LLM provider: {}", config.llm_provider)),
        }
    }
}
