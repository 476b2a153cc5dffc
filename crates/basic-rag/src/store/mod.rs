//! In-memory document storage with BM25 keyword search

pub mod bm25;
pub mod memory;

pub use bm25::{Bm25Algorithm, Bm25Index, Bm25Params};
pub use memory::InMemoryDocumentStore;
