//! Application state for the RAG server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::{OllamaGenerator, PromptBuilder};
use crate::pipeline::RagPipeline;
use crate::providers::Generator;
use crate::retrieval::Bm25Retriever;
use crate::seed;
use crate::store::InMemoryDocumentStore;

/// Shared application state, built once at startup and handed to every handler
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Document store, written once at startup
    store: Arc<InMemoryDocumentStore>,
    /// Retrieve → prompt → generate pipeline
    pipeline: RagPipeline,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state backed by the configured Ollama runtime
    pub fn new(config: RagConfig) -> Result<Self> {
        let generator = Arc::new(OllamaGenerator::new(&config.generator)?);
        tracing::info!(
            "Ollama generator initialized ({} at {})",
            config.generator.model,
            config.generator.base_url
        );
        Self::with_generator(config, generator)
    }

    /// Create application state with an explicit generator
    pub fn with_generator(config: RagConfig, generator: Arc<dyn Generator>) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        // A malformed template is a startup failure, never a request failure
        let prompt_builder = PromptBuilder::new(&config.prompt.template)?;

        let store = Arc::new(InMemoryDocumentStore::from_config(&config.store));
        let written = seed::populate(&store, &config.store)?;
        tracing::info!(
            "Document store initialized with {} documents ({:?})",
            written,
            config.store.bm25_algorithm
        );

        let retriever = Bm25Retriever::new(Arc::clone(&store), &config.retriever)?;
        let pipeline = RagPipeline::new(retriever, prompt_builder, generator);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                pipeline,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get document store
    pub fn store(&self) -> &Arc<InMemoryDocumentStore> {
        &self.inner.store
    }

    /// Get the pipeline
    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
