/// Build the instruction sent to the model for one piece of English text.
///
/// The JSON shape requested here is what `extractor::extract` expects back.
pub fn build_translation_prompt(text: &str) -> String {
    format!(
        r#"Please perform the following tasks:
1. Translate the following English texts into Chinese accurately.
2. Extract important professional words (nouns and technical terms) from the original text to generate a glossary.
3. The output Chinese translation retains the text format of the original text.

English text: {text}

Please return the results strictly in JSON format:
{{
"translation": "Chinese translation results",
"vocabulary": [
{{
"english": "English vocabulary",
"chinese": "Chinese translation",
"explanation": "explain in detail"
}}
]
}}

Requirements:
-Translation should be accurate and fluent, and the consistency of technical terms should be maintained.
-Extract 5-10 most important professional words.
-Explain it concisely."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_and_requested_shape() {
        let prompt = build_translation_prompt("Machine learning is a subset of AI.");
        assert!(prompt.contains("English text: Machine learning is a subset of AI."));
        assert!(prompt.contains(r#""translation": "Chinese translation results""#));
        assert!(prompt.contains(r#""english": "English vocabulary""#));
        assert!(prompt.contains("5-10"));
    }
}
