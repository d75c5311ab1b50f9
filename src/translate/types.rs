use serde::{Deserialize, Serialize};

/// Shown in place of the translation when no payload could be recovered
pub const FALLBACK_TRANSLATION: &str = "翻译解析失败，请重试";

/// One glossary term extracted from the source text.
///
/// On the wire the fields keep the names the model is asked to emit
/// (`english`, `chinese`, `explanation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    #[serde(rename = "english")]
    pub term: String,
    #[serde(rename = "chinese")]
    pub translated_term: String,
    pub explanation: String,
}

impl VocabularyEntry {
    /// Absent fields become empty strings
    pub fn new(
        term: Option<String>,
        translated_term: Option<String>,
        explanation: Option<String>,
    ) -> Self {
        Self {
            term: term.unwrap_or_default(),
            translated_term: translated_term.unwrap_or_default(),
            explanation: explanation.unwrap_or_default(),
        }
    }
}

/// Translation plus glossary. Always fully populated, even on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translation: String,
    pub vocabulary: Vec<VocabularyEntry>,
}

impl TranslationResult {
    pub fn from_parts(translation: Option<String>, vocabulary: Vec<VocabularyEntry>) -> Self {
        Self {
            translation: translation.unwrap_or_default(),
            vocabulary,
        }
    }

    pub fn fallback() -> Self {
        Self {
            translation: FALLBACK_TRANSLATION.to_string(),
            vocabulary: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.translation == FALLBACK_TRANSLATION && self.vocabulary.is_empty()
    }
}
