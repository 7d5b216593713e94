//! Chat-completion provider clients.
//!
//! Mirrors the embedding layer: one [`ChatClient`] trait, an OpenAI-wire
//! implementation and a deterministic mock. No retry and no fallback; a
//! failed completion propagates to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::errors::{AppError, Result};

/// One model generation, as returned by the raw `/chat` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Run the prompt and return all generations.
    async fn generate(&self, prompt: &str) -> Result<Vec<Generation>>;

    /// Run the prompt and return the first generation's text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let generations = self.generate(prompt).await?;
        generations
            .into_iter()
            .next()
            .map(|g| g.text)
            .ok_or_else(|| AppError::Chat("empty completion".to_string()))
    }

    fn model_name(&self) -> &str;
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAIChatClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(api_key: String, config: &ChatConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            base_url: config
                .api_base
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<Generation>> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Chat(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Chat(format!("API error {status}: {body}")));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Chat(format!("invalid response: {e}")))?;

        Ok(result
            .choices
            .into_iter()
            .map(|choice| Generation {
                text: choice.message.content.unwrap_or_default(),
                finish_reason: choice.finish_reason,
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock chat client: echoes the rendered prompt so callers (and tests) can
/// observe exactly what context was forwarded to the model.
pub struct MockChatClient;

#[async_trait]
impl ChatClient for MockChatClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<Generation>> {
        Ok(vec![Generation {
            text: format!("[mock completion] {prompt}"),
            finish_reason: Some("stop".to_string()),
        }])
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}

/// Build a chat client from configuration.
pub fn create_chat_client(config: &ChatConfig) -> Arc<dyn ChatClient> {
    match config.provider.as_str() {
        "openai" => match &config.api_key {
            Some(key) => Arc::new(OpenAIChatClient::new(key.clone(), config)),
            None => {
                tracing::warn!("openai chat provider configured without api_key, using mock");
                Arc::new(MockChatClient)
            }
        },
        "mock" => Arc::new(MockChatClient),
        other => {
            tracing::warn!(provider = other, "Unknown chat provider, using mock");
            Arc::new(MockChatClient)
        }
    }
}
