use std::sync::Arc;
use tracing::info;

use super::extractor::extract;
use super::prompt::build_translation_prompt;
use super::types::TranslationResult;
use crate::errors::LLMError;
use crate::llm::StatelessLLMInterface;

/// Prompt the model for one text and recover the structured result
pub struct TranslationService {
    llm: Arc<dyn StatelessLLMInterface>,
}

impl TranslationService {
    pub fn new(llm: Arc<dyn StatelessLLMInterface>) -> Self {
        Self { llm }
    }

    /// Upstream failures propagate; malformed output degrades to the fallback result.
    pub async fn translate(&self, text: &str) -> Result<TranslationResult, LLMError> {
        let prompt = build_translation_prompt(text);
        let raw = self.llm.complete(&prompt).await?;
        let result = extract(&raw);
        info!(
            "Translated {} chars, {} glossary entries, fallback={}",
            text.chars().count(),
            result.vocabulary.len(),
            result.is_fallback()
        );
        Ok(result)
    }
}
