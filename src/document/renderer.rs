use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::docx::write_docx;
use super::filename::{document_id, generate_document_name};
use super::layout::build_layout;
use super::store::DocumentStore;
use crate::errors::StoreError;
use crate::translate::TranslationResult;

/// A persisted report. Never modified after creation.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub path: PathBuf,
    /// Route under which the download endpoint serves the file
    pub url: String,
    pub size: usize,
}

/// Renders translation reports and writes them to the content store
pub struct DocumentRenderer {
    store: Arc<DocumentStore>,
    url_prefix: String,
}

impl DocumentRenderer {
    pub fn new(store: Arc<DocumentStore>, url_prefix: impl Into<String>) -> Self {
        Self {
            store,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build, encode and persist one report.
    ///
    /// Blocking: performs a filesystem write. Every failure surfaces as a
    /// [`StoreError`] and nothing is retried.
    pub fn render(
        &self,
        original_text: &str,
        result: &TranslationResult,
        include_vocabulary: bool,
    ) -> Result<RenderedDocument, StoreError> {
        let generated_at = Local::now().naive_local();
        let filename = generate_document_name(&generated_at);
        let layout = build_layout(
            original_text,
            result,
            include_vocabulary,
            &generated_at,
            document_id(&filename),
        );

        let bytes = write_docx(&layout).map_err(|e| StoreError::Write {
            name: filename.clone(),
            source: e,
        })?;
        let path = self.store.save(&filename, &bytes)?;

        info!("Rendered document {} ({} bytes)", filename, bytes.len());
        Ok(RenderedDocument {
            url: format!("{}/{}", self.url_prefix, filename),
            filename,
            path,
            size: bytes.len(),
        })
    }
}
