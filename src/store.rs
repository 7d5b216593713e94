//! The vector store.
//!
//! In memory the store is a flat list of chunks with their embeddings;
//! similarity search is a cosine scan ranked descending. On disk the store
//! is one JSON file per source PDF, named by extension substitution
//! (`report.pdf` -> `report.json`). The existence of that file is the sole
//! cache-validity signal: there is no checksum or timestamp, and a changed
//! source PDF is not detected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::{AppError, Result};

/// One embedded chunk. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: Uuid,
    /// Source PDF file name
    pub document: String,
    /// 1-based page the chunk was extracted from
    pub page_number: u32,
    /// Position of the chunk within its document
    pub chunk_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// On-disk format: the full vector set for one source document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentVectors {
    pub document: String,
    pub model: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
    pub chunks: Vec<StoredChunk>,
}

/// A search hit with its cosine similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub score: f32,
    pub document: String,
    pub page_number: u32,
    pub content: String,
}

/// In-memory vector store over all ingested documents.
#[derive(Debug, Default)]
pub struct VectorStore {
    chunks: Vec<StoredChunk>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Names of documents currently present, sorted and de-duplicated.
    pub fn document_names(&self) -> Vec<String> {
        self.chunks
            .iter()
            .map(|c| c.document.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn add_chunks(&mut self, chunks: Vec<StoredChunk>) {
        self.chunks.extend(chunks);
    }

    /// Rank all chunks by cosine similarity to `query`, descending, and
    /// return at most `top_k`. With fewer stored chunks than `top_k`, all
    /// are returned.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(query, &chunk.embedding),
                document: chunk.document.clone(),
                page_number: chunk.page_number,
                content: chunk.content.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

/// Cosine similarity; mismatched or zero-length vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Derive the vector file name for a PDF by extension substitution.
pub fn vector_file_name(pdf_file_name: &str) -> String {
    let path = Path::new(pdf_file_name);
    match path.file_stem() {
        Some(stem) => format!("{}.json", stem.to_string_lossy()),
        None => format!("{pdf_file_name}.json"),
    }
}

/// Outcome of a cache lookup for a source PDF's vector file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// The vector file exists and can be loaded instead of re-embedding.
    Found(PathBuf),
    /// No vector file yet; the payload is where it should be written.
    NotFound(PathBuf),
}

/// Check whether a vector file already exists for `pdf_file_name`.
pub fn cache_lookup(store_dir: &Path, pdf_file_name: &str) -> CacheStatus {
    let path = store_dir.join(vector_file_name(pdf_file_name));
    if path.is_file() {
        CacheStatus::Found(path)
    } else {
        CacheStatus::NotFound(path)
    }
}

/// Serialize one document's vectors to its JSON file.
pub fn save_document(path: &Path, vectors: &DocumentVectors) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(vectors)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load one document's vectors from its JSON file.
pub fn load_document(path: &Path) -> Result<DocumentVectors> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::Store(format!(
            "corrupt vector file {}: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(document: &str, content: &str, embedding: Vec<f32>) -> StoredChunk {
        StoredChunk {
            id: Uuid::new_v4(),
            document: document.to_string(),
            page_number: 1,
            chunk_index: 0,
            content: content.to_string(),
            embedding,
        }
    }

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn search_ranks_by_similarity_and_truncates() {
        let mut store = VectorStore::new();
        store.add_chunks(vec![
            chunk("a.pdf", "north", vec![1.0, 0.0]),
            chunk("a.pdf", "east", vec![0.0, 1.0]),
            chunk("b.pdf", "north-east", vec![0.7, 0.7]),
            chunk("b.pdf", "south", vec![-1.0, 0.0]),
            chunk("c.pdf", "north-ish", vec![0.9, 0.1]),
        ]);

        let hits = store.search(&[1.0, 0.0], 4);
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].content, "north");
        assert_eq!(hits[1].content, "north-ish");
        // the worst match is excluded
        assert!(hits.iter().all(|h| h.content != "south"));
    }

    #[test]
    fn search_returns_all_when_corpus_is_small() {
        let mut store = VectorStore::new();
        store.add_chunks(vec![
            chunk("a.pdf", "one", vec![1.0, 0.0]),
            chunk("a.pdf", "two", vec![0.0, 1.0]),
        ]);
        assert_eq!(store.search(&[1.0, 0.0], 4).len(), 2);
        assert!(VectorStore::new().search(&[1.0, 0.0], 4).is_empty());
    }

    #[test]
    fn document_names_are_sorted_unique() {
        let mut store = VectorStore::new();
        store.add_chunks(vec![
            chunk("b.pdf", "x", vec![1.0]),
            chunk("a.pdf", "y", vec![1.0]),
            chunk("b.pdf", "z", vec![1.0]),
        ]);
        assert_eq!(store.document_names(), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn vector_file_name_substitutes_extension() {
        assert_eq!(vector_file_name("report.pdf"), "report.json");
        assert_eq!(vector_file_name("notes.v2.pdf"), "notes.v2.json");
        assert_eq!(vector_file_name("noext"), "noext.json");
    }

    #[test]
    fn cache_lookup_reflects_file_presence() {
        let dir = tempfile::tempdir().unwrap();
        let status = cache_lookup(dir.path(), "doc.pdf");
        let expected = dir.path().join("doc.json");
        assert_eq!(status, CacheStatus::NotFound(expected.clone()));

        std::fs::write(&expected, b"{}").unwrap();
        assert_eq!(cache_lookup(dir.path(), "doc.pdf"), CacheStatus::Found(expected));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let vectors = DocumentVectors {
            document: "doc.pdf".to_string(),
            model: "mock-embedding".to_string(),
            dimension: 2,
            created_at: Utc::now(),
            chunks: vec![chunk("doc.pdf", "hello", vec![0.5, 0.5])],
        };

        save_document(&path, &vectors).unwrap();
        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded.document, "doc.pdf");
        assert_eq!(loaded.chunks.len(), 1);
        assert_eq!(loaded.chunks[0].content, "hello");
    }

    #[test]
    fn load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"not json").unwrap();
        assert!(load_document(&path).is_err());
    }
}
