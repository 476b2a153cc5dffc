//! In-memory document store

use dashmap::DashMap;
use parking_lot::RwLock;
use std::cmp::Ordering;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::types::{Document, ScoredDocument};

use super::bm25::{scale_score, Bm25Algorithm, Bm25Index, Bm25Params};

/// Document store held in process memory for the lifetime of the service
pub struct InMemoryDocumentStore {
    /// Documents keyed by their assigned identifier
    documents: DashMap<Uuid, Document>,
    /// Keyword statistics, kept in insertion order
    index: RwLock<Bm25Index>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new(algorithm: Bm25Algorithm, params: Bm25Params) -> Self {
        Self {
            documents: DashMap::new(),
            index: RwLock::new(Bm25Index::new(algorithm, params)),
        }
    }

    /// Create an empty store from configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.bm25_algorithm, config.bm25_params())
    }

    /// Append documents. No deduplication and no validation.
    ///
    /// Returns the number of documents written.
    pub fn write<I, D>(&self, documents: I) -> usize
    where
        I: IntoIterator<Item = D>,
        D: Into<Document>,
    {
        let mut index = self.index.write();
        let mut written = 0;

        for doc in documents {
            let doc = doc.into();
            index.add(doc.id, &doc.content);
            self.documents.insert(doc.id, doc);
            written += 1;
        }

        tracing::debug!("Wrote {} documents ({} total)", written, index.len());
        written
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Get a document by ID
    pub fn get(&self, id: &Uuid) -> Option<Document> {
        self.documents.get(id).map(|d| d.clone())
    }

    /// All stored documents, unordered
    pub fn documents(&self) -> Vec<Document> {
        self.documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Rank documents against a query.
    ///
    /// Only documents with a positive score are returned, best first; equal
    /// scores keep insertion order.
    pub fn bm25_retrieval(&self, query: &str, top_k: usize, scale: bool) -> Vec<ScoredDocument> {
        let mut scored: Vec<(Uuid, f32)> = self
            .index
            .read()
            .score(query)
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .filter_map(|(id, score)| {
                let document = self.get(&id)?;
                let score = if scale { scale_score(score) } else { score };
                Some(ScoredDocument { document, score })
            })
            .collect()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new(Bm25Algorithm::default(), Bm25Params::default())
    }
}
