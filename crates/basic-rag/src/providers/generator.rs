//! Generator trait for producing replies from a prompt

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text generation backends
///
/// Implementations:
/// - `OllamaGenerator`: local Ollama runtime
/// - `FixedGenerator`: canned replies, no model
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate replies for a fully built prompt.
    ///
    /// An empty list is a valid outcome, not an error.
    async fn generate(&self, prompt: &str) -> Result<Vec<String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
