//! Text chunking.
//!
//! Splitting itself is delegated to the `text-splitter` crate; sizes are in
//! characters with the usual ~4 chars per token approximation.

use serde::Deserialize;
use text_splitter::{ChunkConfig, TextSplitter};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunks shorter than this are dropped
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_min_chunk_size() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            min_chunk_size: default_min_chunk_size(),
        }
    }
}

/// Split one page of text into chunks suitable for embedding.
pub fn chunk_page(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let splitter = TextSplitter::new(ChunkConfig::new(config.chunk_size));

    let chunks: Vec<String> = splitter
        .chunks(text)
        .filter(|chunk| chunk.len() >= config.min_chunk_size)
        .map(str::to_string)
        .collect();

    debug!(
        input_len = text.len(),
        chunk_count = chunks.len(),
        chunk_size = config.chunk_size,
        "Page chunked"
    );

    chunks
}

/// Rough token estimate used for logging and stored metadata.
pub fn approx_token_count(text: &str) -> usize {
    text.len() / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_long_text_into_bounded_chunks() {
        let text = "This is a sentence about nothing in particular. ".repeat(100);
        let config = ChunkingConfig {
            chunk_size: 200,
            min_chunk_size: 50,
        };

        let chunks = chunk_page(&text, &config);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= config.chunk_size);
            assert!(chunk.len() >= config.min_chunk_size);
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let config = ChunkingConfig {
            chunk_size: 1000,
            min_chunk_size: 10,
        };
        let chunks = chunk_page("A short paragraph that fits in one chunk.", &config);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn empty_and_tiny_text_produce_no_chunks() {
        let config = ChunkingConfig::default();
        assert!(chunk_page("", &config).is_empty());
        assert!(chunk_page("tiny", &config).is_empty());
    }

    #[test]
    fn token_estimate_tracks_length() {
        assert_eq!(approx_token_count(""), 0);
        assert_eq!(approx_token_count(&"x".repeat(400)), 100);
    }
}
