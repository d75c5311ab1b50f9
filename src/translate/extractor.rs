//! Recovers the structured translation payload from free-form model output.
//!
//! The model is asked for bare JSON but routinely wraps it in prose or a
//! Markdown fence. Candidates are tried from strictest to loosest:
//!
//! 1. the whole trimmed text
//! 2. the body of the first ```` ``` ```` fence
//! 3. the span from the first `{` to the last `}`
//! 4. the first `{` from which a complete payload object parses
//!
//! If none of them yields a payload, [`TranslationResult::fallback`] is returned.

use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{TranslationResult, VocabularyEntry};

#[derive(Debug, Deserialize)]
struct RawPayload {
    translation: String,
    #[serde(default)]
    vocabulary: Option<Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    english: Option<String>,
    chinese: Option<String>,
    explanation: Option<String>,
}

impl From<RawPayload> for TranslationResult {
    fn from(raw: RawPayload) -> Self {
        let vocabulary = raw
            .vocabulary
            .unwrap_or_default()
            .into_iter()
            .map(|e| VocabularyEntry::new(e.english, e.chinese, e.explanation))
            .collect();
        TranslationResult::from_parts(Some(raw.translation), vocabulary)
    }
}

/// Extract the translation and glossary from raw model output. Never fails.
pub fn extract(raw_text: &str) -> TranslationResult {
    match find_payload(raw_text) {
        Some(payload) => payload.into(),
        None => {
            warn!(
                "No structured payload in model output ({} chars), using fallback",
                raw_text.len()
            );
            TranslationResult::fallback()
        }
    }
}

fn find_payload(raw_text: &str) -> Option<RawPayload> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(payload) = serde_json::from_str::<RawPayload>(trimmed) {
        debug!("Parsed model output as bare JSON");
        return Some(payload);
    }

    if let Some(payload) = fenced_block(trimmed).and_then(|b| serde_json::from_str(b).ok()) {
        debug!("Parsed payload from fenced block");
        return Some(payload);
    }

    if let Some(payload) = outer_brace_span(trimmed).and_then(|s| serde_json::from_str(s).ok()) {
        debug!("Parsed payload from outermost brace span");
        return Some(payload);
    }

    let payload = first_embedded_object(trimmed);
    if payload.is_some() {
        debug!("Parsed payload from embedded object scan");
    }
    payload
}

/// Body of the first Markdown code fence, with an optional `json` tag removed
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Substring from the first `{` through the last `}`
fn outer_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Try each `{` in turn and keep the first complete payload object.
/// Skips stray braces in commentary that precede the real payload.
fn first_embedded_object(text: &str) -> Option<RawPayload> {
    text.match_indices('{').find_map(|(idx, _)| {
        serde_json::Deserializer::from_str(&text[idx..])
            .into_iter::<RawPayload>()
            .next()
            .and_then(|res| res.ok())
    })
}
