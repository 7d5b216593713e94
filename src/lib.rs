//! docuchat: a minimal retrieval-augmented-generation service.
//!
//! Uploaded PDFs are split into page-level chunks, embedded through an
//! external provider, and persisted as one JSON vector file per document.
//! Questions are answered by retrieving the most similar chunks and
//! forwarding them as context to a chat-completion provider.

pub mod chat;
pub mod chunker;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod metrics;
pub mod pdf;
pub mod prompt;
pub mod routes;
pub mod services;
pub mod store;
pub mod views;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
