//! BM25 retriever

use std::sync::Arc;

use crate::config::RetrieverConfig;
use crate::error::{Error, Result};
use crate::store::InMemoryDocumentStore;
use crate::types::ScoredDocument;

/// Ranks stored documents against a query with BM25
#[derive(Clone)]
pub struct Bm25Retriever {
    store: Arc<InMemoryDocumentStore>,
    top_k: usize,
    scale_score: bool,
}

impl Bm25Retriever {
    /// Create a retriever over a store
    pub fn new(store: Arc<InMemoryDocumentStore>, config: &RetrieverConfig) -> Result<Self> {
        if config.top_k == 0 {
            return Err(Error::config("retriever top_k must be at least 1"));
        }

        Ok(Self {
            store,
            top_k: config.top_k,
            scale_score: config.scale_score,
        })
    }

    /// Configured result limit
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<InMemoryDocumentStore> {
        &self.store
    }

    /// Retrieve up to `top_k` documents, most relevant first
    pub fn retrieve(&self, query: &str) -> Vec<ScoredDocument> {
        self.retrieve_top_k(query, self.top_k)
    }

    /// Retrieve with an explicit result limit
    pub fn retrieve_top_k(&self, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        let results = self.store.bm25_retrieval(query, top_k, self.scale_score);
        tracing::debug!(
            "Retrieved {} of {} documents for \"{}\"",
            results.len(),
            self.store.len(),
            query
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::example_documents;

    fn retriever(top_k: usize) -> Bm25Retriever {
        let store = Arc::new(InMemoryDocumentStore::default());
        store.write(example_documents());
        Bm25Retriever::new(
            store,
            &RetrieverConfig {
                top_k,
                scale_score: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_ranked_descending() {
        let results = retriever(10).retrieve("Who is a chartered accountant?");
        assert_eq!(results[0].content(), "Mary is a chartered accountant");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_top_k_limits_results() {
        let retriever = retriever(1);
        assert_eq!(retriever.retrieve("Who is a chartered accountant?").len(), 1);
        assert_eq!(
            retriever
                .retrieve_top_k("Who is a chartered accountant?", 3)
                .len(),
            2
        );
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let store = Arc::new(InMemoryDocumentStore::default());
        let result = Bm25Retriever::new(
            store,
            &RetrieverConfig {
                top_k: 0,
                scale_score: false,
            },
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
