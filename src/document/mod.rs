pub mod layout;
pub mod docx;
pub mod filename;
pub mod store;
pub mod renderer;

pub use store::DocumentStore;
pub use renderer::DocumentRenderer;
