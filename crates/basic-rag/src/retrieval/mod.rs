//! Keyword retrieval over the document store

pub mod bm25;

pub use bm25::Bm25Retriever;
