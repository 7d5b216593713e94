//! Error types for the docuchat service.
//!
//! The taxonomy is deliberately flat: any failure during file I/O, PDF
//! parsing, embedding or chat completion is logged where it happens and
//! propagated as an [`AppError`]. There is no retry policy and no
//! partial-success handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("PDF parse error for {path}: {message}")]
    PdfParse { path: String, message: String },

    #[error("Chunking error: {0}")]
    Chunking(String),

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Chat provider error: {0}")]
    Chat(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Embedding(_) | Self::Chat(_) | Self::HttpClient(_) => StatusCode::BAD_GATEWAY,
            Self::PdfParse { .. }
            | Self::Chunking(_)
            | Self::Store(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%message, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(%message, status = status.as_u16(), "Client error");
        }

        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_bad_gateway() {
        assert_eq!(
            AppError::Embedding("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Chat("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn parse_and_store_errors_are_internal() {
        let err = AppError::PdfParse {
            path: "a.pdf".into(),
            message: "bad xref".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Validation("empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
