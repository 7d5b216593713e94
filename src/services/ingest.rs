//! Ingestion pipeline.
//!
//! Walks the PDF directory and, for each document, either loads its
//! existing JSON vector file or runs the full extract -> chunk -> embed ->
//! persist pipeline. Any failure aborts the sync: a single corrupt PDF is
//! treated as fatal rather than partially ingested.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::chunker::{self, ChunkingConfig};
use crate::embeddings::Embedder;
use crate::errors::{AppError, Result};
use crate::pdf;
use crate::store::{self, CacheStatus, DocumentVectors, StoredChunk, VectorStore};

/// Counts from one sync pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncReport {
    /// Documents restored from existing vector files
    pub documents_loaded: usize,
    /// Documents freshly extracted and embedded
    pub documents_embedded: usize,
    pub chunks_total: usize,
}

pub struct IngestService {
    pdf_dir: PathBuf,
    store_dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    chunking: ChunkingConfig,
}

impl IngestService {
    pub fn new(
        pdf_dir: impl Into<PathBuf>,
        store_dir: impl Into<PathBuf>,
        embedder: Arc<dyn Embedder>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            pdf_dir: pdf_dir.into(),
            store_dir: store_dir.into(),
            embedder,
            chunking,
        }
    }

    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    /// Recursively list the PDF files under the configured directory,
    /// sorted for deterministic processing order.
    pub fn discover_pdfs(&self) -> Vec<PathBuf> {
        if !self.pdf_dir.exists() {
            return Vec::new();
        }
        let mut pdfs: Vec<PathBuf> = WalkDir::new(&self.pdf_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();
        pdfs.sort();
        pdfs
    }

    /// Bring `store` in sync with the PDF directory.
    ///
    /// A document whose vector file already exists is loaded as-is, with no
    /// embedding calls; file existence is the only cache-validity signal.
    pub async fn sync(&self, store: &mut VectorStore) -> Result<SyncReport> {
        let start = Instant::now();
        let mut report = SyncReport::default();
        let already_present = store.document_names();

        for pdf_path in self.discover_pdfs() {
            let file_name = pdf_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if already_present.iter().any(|d| d == &file_name) {
                continue;
            }

            match store::cache_lookup(&self.store_dir, &file_name) {
                CacheStatus::Found(vector_path) => {
                    let vectors = store::load_document(&vector_path).map_err(|e| {
                        error!(path = %vector_path.display(), error = %e, "Failed to load vector file");
                        e
                    })?;
                    info!(
                        document = %file_name,
                        chunks = vectors.chunks.len(),
                        "Vector file exists, loaded from disk"
                    );
                    report.chunks_total += vectors.chunks.len();
                    report.documents_loaded += 1;
                    store.add_chunks(vectors.chunks);
                }
                CacheStatus::NotFound(vector_path) => {
                    let chunks = self
                        .process_pdf(&pdf_path, &file_name, &vector_path)
                        .await
                        .map_err(|e| {
                            error!(path = %pdf_path.display(), error = %e, "Failed to ingest PDF");
                            e
                        })?;
                    report.chunks_total += chunks.len();
                    report.documents_embedded += 1;
                    store.add_chunks(chunks);
                }
            }
        }

        metrics::counter!("docuchat_ingest_documents_total")
            .increment(report.documents_embedded as u64);
        metrics::counter!("docuchat_ingest_chunks_total").increment(report.chunks_total as u64);
        metrics::histogram!("docuchat_ingest_sync_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        info!(
            loaded = report.documents_loaded,
            embedded = report.documents_embedded,
            chunks = report.chunks_total,
            "Ingestion sync complete"
        );
        Ok(report)
    }

    /// Extract, chunk and embed one PDF, then persist its vector file.
    async fn process_pdf(
        &self,
        pdf_path: &Path,
        file_name: &str,
        vector_path: &Path,
    ) -> Result<Vec<StoredChunk>> {
        let pages = pdf::extract_pages(pdf_path)?;

        let mut texts = Vec::new();
        let mut page_numbers = Vec::new();
        for page in &pages {
            for chunk_text in chunker::chunk_page(&page.text, &self.chunking) {
                texts.push(chunk_text);
                page_numbers.push(page.page_number);
            }
        }

        if texts.is_empty() {
            return Err(AppError::Chunking(format!(
                "no chunks produced for {file_name}"
            )));
        }

        let embedding_start = Instant::now();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        metrics::histogram!("docuchat_embedding_duration_seconds")
            .record(embedding_start.elapsed().as_secs_f64());

        if embeddings.len() != texts.len() {
            return Err(AppError::Embedding(format!(
                "provider returned {} embeddings for {} chunks",
                embeddings.len(),
                texts.len()
            )));
        }

        let chunks: Vec<StoredChunk> = texts
            .into_iter()
            .zip(embeddings)
            .zip(page_numbers)
            .enumerate()
            .map(|(index, ((content, embedding), page_number))| StoredChunk {
                id: Uuid::new_v4(),
                document: file_name.to_string(),
                page_number,
                chunk_index: index,
                content,
                embedding,
            })
            .collect();

        let vectors = DocumentVectors {
            document: file_name.to_string(),
            model: self.embedder.model_name().to_string(),
            dimension: self.embedder.dimension(),
            created_at: chrono::Utc::now(),
            chunks,
        };
        store::save_document(vector_path, &vectors)?;

        info!(
            document = file_name,
            chunks = vectors.chunks.len(),
            vector_file = %vector_path.display(),
            "PDF ingested and vector file written"
        );
        Ok(vectors.chunks)
    }
}

/// Validate and persist an uploaded PDF into `pdf_dir`.
///
/// An empty payload or a non-PDF file name is rejected before anything is
/// written, leaving the directory unchanged.
pub fn store_pdf_upload(pdf_dir: &Path, file_name: &str, data: &[u8]) -> Result<String> {
    // Strip any client-supplied path components
    let file_name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.is_empty()
        || data.is_empty()
        || !file_name.to_ascii_lowercase().ends_with(".pdf")
    {
        return Err(AppError::Validation(
            "Please select a PDF file to upload.".to_string(),
        ));
    }

    std::fs::create_dir_all(pdf_dir)?;
    let target = pdf_dir.join(&file_name);
    std::fs::write(&target, data)?;

    info!(file = %file_name, bytes = data.len(), "File uploaded successfully");
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_non_pdf_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_dir = dir.path().join("pdfs");

        assert!(store_pdf_upload(&pdf_dir, "", b"data").is_err());
        assert!(store_pdf_upload(&pdf_dir, "file.pdf", b"").is_err());
        assert!(store_pdf_upload(&pdf_dir, "notes.txt", b"data").is_err());
        // nothing was written, not even the directory
        assert!(!pdf_dir.exists());
    }

    #[test]
    fn stores_valid_upload_under_its_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_dir = dir.path().join("pdfs");

        let saved = store_pdf_upload(&pdf_dir, "../../evil/report.pdf", b"%PDF-1.5").unwrap();
        assert_eq!(saved, "report.pdf");
        assert!(pdf_dir.join("report.pdf").is_file());
    }

    #[test]
    fn discover_pdfs_is_empty_for_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let service = IngestService::new(
            dir.path().join("nope"),
            dir.path().join("store"),
            Arc::new(crate::embeddings::MockEmbedder::new(8)),
            ChunkingConfig::default(),
        );
        assert!(service.discover_pdfs().is_empty());
    }
}
