//! Startup documents

use serde::Deserialize;
use std::path::Path;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::InMemoryDocumentStore;
use crate::types::Document;

/// The three example documents the service ships with
pub const EXAMPLE_DOCUMENTS: [&str; 3] = [
    "Naim hates brussels sprouts",
    "John is looking for a solar panel provider to reduce his energy costs. ",
    "Mary is a chartered accountant",
];

/// Example documents as fresh `Document`s
pub fn example_documents() -> Vec<Document> {
    EXAMPLE_DOCUMENTS.iter().copied().map(Document::from).collect()
}

/// One entry of a documents file: either a bare string or `{"content": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentEntry {
    Text(String),
    Object { content: String },
}

/// Read a JSON array of documents
pub fn load_documents_file(path: &Path) -> Result<Vec<Document>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read documents '{}': {}", path.display(), e))
    })?;
    let entries: Vec<DocumentEntry> = serde_json::from_str(&raw)?;

    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            DocumentEntry::Text(content) | DocumentEntry::Object { content } => {
                Document::new(content)
            }
        })
        .collect())
}

/// Write the configured startup documents into the store
pub fn populate(store: &InMemoryDocumentStore, config: &StoreConfig) -> Result<usize> {
    let mut written = 0;

    if config.seed_example_documents {
        written += store.write(example_documents());
    }

    if let Some(path) = &config.documents_path {
        let documents = load_documents_file(path)?;
        tracing::info!("Loaded {} documents from {}", documents.len(), path.display());
        written += store.write(documents);
    }

    Ok(written)
}
