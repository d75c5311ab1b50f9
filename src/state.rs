use std::sync::Arc;

use crate::config::Config;
use crate::document::{DocumentRenderer, DocumentStore};
use crate::llm::{StatelessLLMFactory, StatelessLLMInterface};
use crate::translate::TranslationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translator: Arc<TranslationService>,
    pub renderer: Arc<DocumentRenderer>,
    pub store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = StatelessLLMFactory::create_llm(&config.llm_config)?;
        Ok(Self::with_llm(config, llm))
    }

    /// Assemble the collaborators around an already constructed model client
    pub fn with_llm(config: Config, llm: Arc<dyn StatelessLLMInterface>) -> Self {
        let system_config = &config.system_config;
        let store = Arc::new(DocumentStore::new(system_config.downloads_path()));
        let renderer = Arc::new(DocumentRenderer::new(
            store.clone(),
            system_config.download_route_prefix.clone(),
        ));

        Self {
            config: Arc::new(config),
            translator: Arc::new(TranslationService::new(llm)),
            renderer,
            store,
        }
    }
}
