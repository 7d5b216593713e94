//! REST endpoints for question answering.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::{AppError, Result};
use crate::services::AppState;

#[derive(Deserialize)]
pub struct QuestionParams {
    pub question: String,
}

/// `GET /ask?question=`: retrieval-augmented answer as markdown text.
#[instrument(skip(state, params))]
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<QuestionParams>,
) -> Result<impl IntoResponse> {
    if params.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }
    let answer = state.rag.ask(&params.question).await?;
    Ok(([(header::CONTENT_TYPE, "text/markdown")], answer))
}

/// `GET /ask1?question=`: answer against the canned demo context.
#[instrument(skip(state, params))]
pub async fn ask_canned(
    State(state): State<AppState>,
    Query(params): Query<QuestionParams>,
) -> Result<impl IntoResponse> {
    if params.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }
    let answer = state.rag.ask_canned(&params.question).await?;
    Ok(([(header::CONTENT_TYPE, "text/markdown")], answer))
}

/// `GET /chat?question=`: raw completion, all generations as JSON.
#[instrument(skip(state, params))]
pub async fn chat(
    State(state): State<AppState>,
    Query(params): Query<QuestionParams>,
) -> Result<impl IntoResponse> {
    let generations = state.rag.chat_raw(&params.question).await?;
    Ok(Json(generations))
}
