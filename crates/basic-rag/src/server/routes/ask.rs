//! Question answering endpoint

use axum::{
    body::Bytes,
    extract::{Query, State},
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskParams, AskRequest};

/// GET|POST /ask - answer a question from the stored documents
///
/// The question comes from the JSON body, then the query string, then the
/// configured default. Returns the first generated reply, or the fallback
/// answer when the model produced none.
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
    body: Bytes,
) -> Result<String> {
    let request = AskRequest::from_body(&body)
        .map_err(|e| Error::InvalidRequest(format!("Invalid JSON body: {}", e)))?;

    let question = request
        .question
        .or(params.question)
        .unwrap_or_else(|| state.config().prompt.default_question.clone());

    tracing::info!("Question: \"{}\"", question);

    let output = state.pipeline().run(&question).await?;

    match output.replies.into_iter().next() {
        Some(reply) => Ok(reply),
        None => {
            tracing::warn!("Generator returned no replies, using fallback answer");
            Ok(state.config().prompt.fallback_answer.clone())
        }
    }
}
