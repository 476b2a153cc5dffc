//! Core types for the RAG service

pub mod document;
pub mod query;

pub use document::{Document, ScoredDocument};
pub use query::{AskParams, AskRequest};
