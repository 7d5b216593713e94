pub mod ingest;
pub mod rag;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::chat::ChatClient;
use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::services::ingest::IngestService;
use crate::services::rag::RagService;
use crate::store::VectorStore;

/// Everything the request handlers need, wired explicitly at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<RwLock<VectorStore>>,
    pub ingest: Arc<IngestService>,
    pub rag: Arc<RagService>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<RwLock<VectorStore>>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        let ingest = Arc::new(IngestService::new(
            &config.storage.pdf_dir,
            &config.storage.vector_store_dir,
            embedder.clone(),
            config.chunking.clone(),
        ));
        let rag = Arc::new(RagService::new(store.clone(), embedder, chat));

        Self {
            config,
            store,
            ingest,
            rag,
        }
    }
}
