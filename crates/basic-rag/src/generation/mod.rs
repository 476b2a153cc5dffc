//! Prompt construction and model-backed generation

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaGenerator;
pub use prompt::PromptBuilder;
