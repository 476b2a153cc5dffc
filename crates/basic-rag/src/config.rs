//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::store::bm25::{Bm25Algorithm, Bm25Params};

/// Default prompt template.
///
/// `{documents}` expands to one document per line, `{question}` to the question.
pub const DEFAULT_TEMPLATE: &str = "\
Given the documents below, answer the question. Be precise
and exact in your answer. I believe that you can do it!
Documents:
    {documents}
Question: {question}
Answer:";

/// Question used when a request does not carry one
pub const DEFAULT_QUESTION: &str = "Who is a chartered accountant?";

/// Answer returned when the generator produces no replies
pub const FALLBACK_ANSWER: &str = "You asked a very hard question!";

/// Main RAG service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Document store configuration
    pub store: StoreConfig,
    /// Retriever configuration
    pub retriever: RetrieverConfig,
    /// Prompt configuration
    pub prompt: PromptConfig,
    /// Generator (Ollama) configuration
    pub generator: GeneratorConfig,
}

impl RagConfig {
    /// Parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config: RagConfig = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Load configuration from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `BASIC_RAG_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BASIC_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BASIC_RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::config(format!("Invalid BASIC_RAG_PORT '{}': {}", port, e)))?;
        }
        if let Some(model) = lookup("BASIC_RAG_MODEL") {
            self.generator.model = model;
        }
        if let Some(url) = lookup("BASIC_RAG_OLLAMA_URL") {
            self.generator.base_url = url;
        }
        Ok(())
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("server.port must be non-zero"));
        }
        if self.retriever.top_k == 0 {
            return Err(Error::config("retriever.top_k must be at least 1"));
        }
        if self.store.k1 < 0.0 {
            return Err(Error::config("store.k1 must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.store.b) {
            return Err(Error::config("store.b must be within [0, 1]"));
        }
        if self.generator.model.trim().is_empty() {
            return Err(Error::config("generator.model must not be empty"));
        }
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

/// In-memory document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// BM25 variant used for scoring
    pub bm25_algorithm: Bm25Algorithm,
    /// Term frequency saturation
    pub k1: f32,
    /// Length normalization (0.0 = none, 1.0 = full)
    pub b: f32,
    /// Lower bound added to matching terms (BM25L / BM25+ only)
    pub delta: f32,
    /// Write the three example documents at startup
    pub seed_example_documents: bool,
    /// Optional JSON file with extra documents to write at startup
    pub documents_path: Option<PathBuf>,
}

impl StoreConfig {
    /// BM25 parameters for the store
    pub fn bm25_params(&self) -> Bm25Params {
        Bm25Params {
            k1: self.k1,
            b: self.b,
            delta: self.delta,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let params = Bm25Params::default();
        Self {
            bm25_algorithm: Bm25Algorithm::default(),
            k1: params.k1,
            b: params.b,
            delta: params.delta,
            seed_example_documents: true,
            documents_path: None,
        }
    }
}

/// Retriever configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Maximum number of documents handed to the prompt (default: 10)
    pub top_k: usize,
    /// Squash raw BM25 scores into (0, 1)
    pub scale_score: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            scale_score: false,
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Template with `{documents}` and `{question}` placeholders
    pub template: String,
    /// Question used when the request has none
    pub default_question: String,
    /// Answer returned when the model produced no replies
    pub fallback_answer: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            default_question: DEFAULT_QUESTION.to_string(),
            fallback_answer: FALLBACK_ANSWER.to_string(),
        }
    }
}

/// Kind of generation the model performs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationTask {
    /// Sequence-to-sequence: the reply is only the generated text
    #[default]
    #[serde(rename = "text2text-generation")]
    Text2TextGeneration,
    /// Causal LM: the reply may echo the prompt, which is stripped
    #[serde(rename = "text-generation")]
    TextGeneration,
}

/// Generator (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Model identifier passed to the runtime
    pub model: String,
    /// Generation task
    pub task: GenerationTask,
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    /// Sampling temperature (runtime default when unset)
    pub temperature: Option<f32>,
    /// Client-side request timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "google/flan-t5-large".to_string(),
            task: GenerationTask::default(),
            max_new_tokens: 512,
            temperature: None,
            timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retriever.top_k, 10);
        assert_eq!(config.generator.model, "google/flan-t5-large");
        assert_eq!(config.generator.task, GenerationTask::Text2TextGeneration);
        assert_eq!(config.store.bm25_algorithm, Bm25Algorithm::L);
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8081

[retriever]
top_k = 2

[generator]
model = "flan-t5-small"
task = "text-generation"
"#
        )
        .unwrap();

        let config = RagConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.retriever.top_k, 2);
        assert!(!config.retriever.scale_score);
        assert_eq!(config.generator.model, "flan-t5-small");
        assert_eq!(config.generator.task, GenerationTask::TextGeneration);
        assert_eq!(config.prompt.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_example_config_parses() {
        let config: RagConfig = toml::from_str(include_str!("../rag.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.prompt.template, DEFAULT_TEMPLATE);
        assert_eq!(config.prompt.fallback_answer, FALLBACK_ANSWER);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(RagConfig::from_file(file.path()), Err(Error::Toml(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BASIC_RAG_PORT", "9000"),
            ("BASIC_RAG_MODEL", "llama3.2:3b"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.generator.model, "llama3.2:3b");
        assert_eq!(config.generator.base_url, "http://localhost:11434");

        let mut config = RagConfig::default();
        let err = config
            .apply_overrides(|key| (key == "BASIC_RAG_PORT").then(|| "nope".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = RagConfig::default();
        config.retriever.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = RagConfig::default();
        config.store.b = 1.5;
        assert!(config.validate().is_err());
    }
}
