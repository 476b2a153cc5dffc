//! Generator returning canned replies

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;

use super::generator::Generator;

/// Returns the same replies for every prompt and remembers the prompts seen
pub struct FixedGenerator {
    replies: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl FixedGenerator {
    /// Generator that always answers with `replies`
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator that never produces a reply
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Generator for FixedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.replies.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fixed"
    }

    fn model(&self) -> &str {
        "none"
    }
}
