//! API routes for the RAG server

pub mod ask;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", get(ask::ask).post(ask::ask))
        .route("/info", get(info))
}

/// Service info endpoint
async fn info(State(state): State<AppState>) -> Json<Value> {
    let config = state.config();
    let generator = state.pipeline().generator();

    Json(json!({
        "name": "basic-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Question answering over in-memory documents with BM25 retrieval",
        "generator": {
            "backend": generator.name(),
            "model": generator.model(),
        },
        "documents": state.store().len(),
        "retriever": {
            "algorithm": config.store.bm25_algorithm,
            "top_k": config.retriever.top_k,
        },
        "endpoints": {
            "POST /ask": "Answer a question (JSON body {\"question\": ...}, optional)",
            "GET /ask?question=...": "Answer a question",
            "GET /health": "Liveness",
            "GET /ready": "Readiness"
        }
    }))
}
