//! Query answering.
//!
//! Embeds the question, retrieves the top-K most similar chunks, joins
//! their text into the prompt template and forwards the rendered prompt to
//! the chat provider. No retry, no fallback: a provider failure propagates
//! to the web layer.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::chat::{ChatClient, Generation};
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::prompt;
use crate::store::VectorStore;

/// Number of chunks retrieved per question.
const TOP_K: usize = 4;

/// Demo template for the canned-context endpoint.
const CANNED_TEMPLATE: &str = "\
<INST>You are an AI assistant that can answer questions. Use the content \
provided. If you don't know the answer, don't make suggestions, just say \
\"I don't know\".</INST>
content: {content}
question: {input}
";

/// Canned context for the demo endpoint.
const STAFF_NOTES: &str = "\
Alex is a programmer working for Initech Consulting.

Alex is under paid.

Bob is a programmer working for Acme Programming.

Bob is paid more than Alex.

Initech Consulting is a consulting company that employs programmers.
";

pub struct RagService {
    store: Arc<RwLock<VectorStore>>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatClient>,
}

impl RagService {
    pub fn new(
        store: Arc<RwLock<VectorStore>>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            store,
            embedder,
            chat,
        }
    }

    /// Answer a question with retrieval-augmented generation.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let query_embedding = self.embedder.embed(question).await?;

        let hits = self.store.read().await.search(&query_embedding, TOP_K);
        debug!(
            question_len = question.len(),
            retrieved = hits.len(),
            top_score = hits.first().map(|h| h.score).unwrap_or(0.0),
            "Similarity search complete"
        );

        let context: Vec<String> = hits.into_iter().map(|h| h.content).collect();
        let rendered = prompt::rag_prompt(&context, question);

        let answer = self.chat.complete(&rendered).await?;
        metrics::counter!("docuchat_rag_queries_total").increment(1);
        Ok(answer)
    }

    /// Answer against a fixed canned context instead of the vector store.
    pub async fn ask_canned(&self, question: &str) -> Result<String> {
        let rendered = prompt::render(
            CANNED_TEMPLATE,
            &[("content", STAFF_NOTES), ("input", question)],
        );
        let answer = self.chat.complete(&rendered).await?;
        metrics::counter!("docuchat_canned_queries_total").increment(1);
        Ok(answer)
    }

    /// Forward the question verbatim and return every generation.
    pub async fn chat_raw(&self, question: &str) -> Result<Vec<Generation>> {
        let generations = self.chat.generate(question).await?;
        metrics::counter!("docuchat_chat_requests_total").increment(1);
        Ok(generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MockChatClient;
    use crate::embeddings::MockEmbedder;
    use crate::store::StoredChunk;
    use uuid::Uuid;

    async fn service_with_chunks(contents: &[&str]) -> RagService {
        let embedder = Arc::new(MockEmbedder::new(32));
        let mut store = VectorStore::new();
        let chunks = embedded_chunks(&embedder, contents).await;
        store.add_chunks(chunks);
        RagService::new(
            Arc::new(RwLock::new(store)),
            embedder,
            Arc::new(MockChatClient),
        )
    }

    async fn embedded_chunks(embedder: &MockEmbedder, contents: &[&str]) -> Vec<StoredChunk> {
        let mut chunks = Vec::new();
        for (i, content) in contents.iter().enumerate() {
            chunks.push(StoredChunk {
                id: Uuid::new_v4(),
                document: "doc.pdf".to_string(),
                page_number: 1,
                chunk_index: i,
                content: content.to_string(),
                embedding: embedder.embed(content).await.unwrap(),
            });
        }
        chunks
    }

    #[tokio::test]
    async fn answer_incorporates_retrieved_context() {
        let service = service_with_chunks(&[
            "The warranty period is twelve months.",
            "Shipping takes three to five days.",
        ])
        .await;

        // mock chat echoes the prompt, so retrieved context is visible
        let answer = service.ask("The warranty period is twelve months.").await.unwrap();
        assert!(answer.contains("The warranty period is twelve months."));
        assert!(answer.contains("question:"));
    }

    #[tokio::test]
    async fn ask_works_with_empty_store() {
        let service = service_with_chunks(&[]).await;
        let answer = service.ask("Anything there?").await.unwrap();
        assert!(answer.contains("Anything there?"));
    }

    #[tokio::test]
    async fn canned_answer_uses_staff_notes() {
        let service = service_with_chunks(&[]).await;
        let answer = service.ask_canned("Who employs Alex?").await.unwrap();
        assert!(answer.contains("Initech Consulting"));
        assert!(answer.contains("Who employs Alex?"));
    }

    #[tokio::test]
    async fn chat_raw_returns_generations() {
        let service = service_with_chunks(&[]).await;
        let generations = service.chat_raw("hello model").await.unwrap();
        assert_eq!(generations.len(), 1);
        assert!(generations[0].text.contains("hello model"));
    }
}
