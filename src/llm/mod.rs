pub mod stateless_llm_interface;
pub mod openai_compatible_llm;
pub mod stateless_llm_factory;

pub use stateless_llm_interface::*;
pub use stateless_llm_factory::*;
