//! Document types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text document held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned on construction
    pub id: Uuid,
    /// Text content
    pub content: String,
}

impl Document {
    /// Create a document with a fresh identifier
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
        }
    }
}

impl From<&str> for Document {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Document {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

/// A document together with its relevance score for one query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

impl ScoredDocument {
    /// Document content
    pub fn content(&self) -> &str {
        &self.document.content
    }
}

impl AsRef<str> for ScoredDocument {
    fn as_ref(&self) -> &str {
        &self.document.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Document::new("same");
        let b = Document::new("same");
        assert_ne!(a.id, b.id);
        assert_eq!(a.content, b.content);
    }
}
