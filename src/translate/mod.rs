pub mod types;
pub mod prompt;
pub mod extractor;
pub mod service;

pub use types::*;
pub use service::TranslationService;
