//! basic-rag: question answering over a handful of in-memory documents
//!
//! A question is matched against the stored documents with BM25, the best
//! matches are poured into a prompt template, and a local model (served by
//! Ollama) writes the answer. The whole thing sits behind one `/ask` endpoint.

pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod seed;
pub mod server;
pub mod store;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::{PipelineOutput, RagPipeline};
pub use server::{create_app, AppState, RagServer};
pub use types::{Document, ScoredDocument};
