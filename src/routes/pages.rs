//! HTML form handlers: index, upload, ask.

use axum::{
    extract::{Multipart, State},
    response::Html,
    Form,
};
use serde::Deserialize;
use tracing::{error, instrument};

use crate::errors::{AppError, Result};
use crate::services::{ingest, AppState};
use crate::views;

#[derive(Deserialize)]
pub struct QuestionForm {
    pub question: String,
}

pub async fn index() -> Html<String> {
    Html(views::index_page())
}

pub async fn upload_form() -> Html<String> {
    Html(views::upload_page(None))
}

/// Accept a multipart PDF upload on the `pdfFile` field, then re-run the
/// ingestion sync over the whole directory. Already-processed documents are
/// skipped via their existing vector files. Failures are rendered as a
/// message on the same page rather than an error response.
#[instrument(skip(state, multipart))]
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        if field.name() != Some("pdfFile") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Multipart(e.to_string()))?;
        upload = Some((file_name, data.to_vec()));
    }

    let Some((file_name, data)) = upload else {
        return Ok(Html(views::upload_page(Some(
            "Please select a PDF file to upload.",
        ))));
    };

    let message = match save_and_ingest(&state, &file_name, &data).await {
        Ok(saved) => format!("File uploaded successfully: {saved}"),
        Err(AppError::Validation(message)) => message,
        Err(e) => {
            error!(error = %e, "Upload processing failed");
            format!("Failed to upload file: {e}")
        }
    };

    Ok(Html(views::upload_page(Some(&message))))
}

async fn save_and_ingest(state: &AppState, file_name: &str, data: &[u8]) -> Result<String> {
    let saved = ingest::store_pdf_upload(state.ingest.pdf_dir(), file_name, data)?;

    let mut store = state.store.write().await;
    state.ingest.sync(&mut store).await?;
    Ok(saved)
}

/// Chat page listing the ingested documents by their vector-file names.
pub async fn ask_form(State(state): State<AppState>) -> Html<String> {
    let documents = vector_file_names(&state).await;
    Html(views::chat_page(&documents, None))
}

/// Answer the posted question and re-render the chat page.
#[instrument(skip(state, form))]
pub async fn ask_submit(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Result<Html<String>> {
    let answer = state.rag.ask(&form.question).await?;
    let documents = vector_file_names(&state).await;
    Ok(Html(views::chat_page(&documents, Some(&answer))))
}

async fn vector_file_names(state: &AppState) -> Vec<String> {
    state
        .store
        .read()
        .await
        .document_names()
        .iter()
        .map(|name| crate::store::vector_file_name(name))
        .collect()
}
