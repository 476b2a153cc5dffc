//! Request types for the ask endpoint

use serde::{Deserialize, Serialize};

/// JSON body of `POST /ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer; the configured default is used when absent
    #[serde(default)]
    pub question: Option<String>,
}

/// Query string of `GET /ask` (also accepted on `POST`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskParams {
    pub question: Option<String>,
}

impl AskRequest {
    /// Create a request for a question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
        }
    }

    /// Parse a request body; an empty body means "use the default question"
    pub fn from_body(body: &[u8]) -> serde_json::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body() {
        assert!(AskRequest::from_body(b"").unwrap().question.is_none());
        assert!(AskRequest::from_body(b"  \n").unwrap().question.is_none());
        assert!(AskRequest::from_body(b"{}").unwrap().question.is_none());
        assert_eq!(
            AskRequest::from_body(br#"{"question": "Who hates sprouts?"}"#)
                .unwrap()
                .question
                .as_deref(),
            Some("Who hates sprouts?")
        );
        assert!(AskRequest::from_body(b"{not json").is_err());
    }
}
