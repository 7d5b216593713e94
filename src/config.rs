//! Configuration for the docuchat service.
//!
//! Layered loading: programmatic defaults, then an optional `config/default`
//! file, then environment variables with the `APP` prefix and `__` separator
//! (e.g. `APP__SERVER__PORT=8080`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::chunker::ChunkingConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub chat: ChatConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// EnvFilter directive string for log output
    #[serde(default = "default_rust_log")]
    pub rust_log: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    /// Upper bound on an uploaded PDF, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory scanned for source PDFs (uploads land here too)
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,

    /// Directory holding one JSON vector file per ingested PDF
    #[serde(default = "default_vector_store_dir")]
    pub vector_store_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: "openai" or "mock"
    #[serde(default = "default_provider")]
    pub provider: String,

    pub api_key: Option<String>,

    /// Base URL override for OpenAI-compatible endpoints
    pub api_base: Option<String>,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Chat provider: "openai" or "mock"
    #[serde(default = "default_provider")]
    pub provider: String,

    pub api_key: Option<String>,

    pub api_base: Option<String>,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_rust_log() -> String {
    "info,docuchat=debug".to_string()
}
fn default_request_timeout() -> u64 {
    60
}
fn default_max_concurrent() -> usize {
    100
}
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}
fn default_pdf_dir() -> String {
    "data/pdfs".to_string()
}
fn default_vector_store_dir() -> String {
    "data/vectorstore".to_string()
}
fn default_provider() -> String {
    "mock".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_embedding_dimension() -> usize {
    1536
}
fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_provider_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from defaults, optional files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("storage.pdf_dir", default_pdf_dir())?
            .set_default("storage.vector_store_dir", default_vector_store_dir())?
            .set_default("embedding.provider", default_provider())?
            .set_default("chat.provider", default_provider())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                rust_log: default_rust_log(),
                request_timeout_secs: default_request_timeout(),
                max_concurrent_requests: default_max_concurrent(),
                max_upload_bytes: default_max_upload_bytes(),
            },
            storage: StorageConfig {
                pdf_dir: default_pdf_dir(),
                vector_store_dir: default_vector_store_dir(),
            },
            embedding: EmbeddingConfig {
                provider: default_provider(),
                api_key: None,
                api_base: None,
                model: default_embedding_model(),
                dimension: default_embedding_dimension(),
                timeout_secs: default_provider_timeout(),
            },
            chat: ChatConfig {
                provider: default_provider(),
                api_key: None,
                api_base: None,
                model: default_chat_model(),
                temperature: default_temperature(),
                timeout_secs: default_provider_timeout(),
            },
            chunking: ChunkingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_usable() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.pdf_dir, "data/pdfs");
        assert_eq!(config.embedding.provider, "mock");
    }
}
