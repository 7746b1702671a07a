use super::config::{ConnectorConfig, LlmServiceConfig};
use super::errors::ConnectorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion backend
#[async_trait]
pub trait LlmConnector: Send + Sync {
    /// Returns the assistant reply for an ordered list of prompt messages
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ConnectorError>;

    async fn health(&self) -> Result<(), ConnectorError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an Ollama-compatible `/api/chat` endpoint
pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: f32,
    http_client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: LlmServiceConfig) -> Result<Self, ConnectorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConnectorError::Internal(err.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            http_client,
        })
    }
}

#[async_trait]
impl LlmConnector for OllamaClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ConnectorError> {
        let span = tracing::info_span!(
            "llm_chat_completion",
            model = %self.model,
            messages = messages.len()
        );
        let url = format!("{}/api/chat", self.base_url);
        let payload = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let resp = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "LLM server returned an error");
            return Err(ConnectorError::HttpError(format!(
                "LLM server returned {}",
                status
            )));
        }

        let reply = resp
            .json::<ChatResponse>()
            .await
            .map_err(|err| ConnectorError::InvalidResponse(err.to_string()))?;

        Ok(reply.message.content.trim().to_string())
    }

    async fn health(&self) -> Result<(), ConnectorError> {
        self.http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub mod mock {
    use super::*;

    /// Answers without a model server, echoing the last user message.
    #[derive(Default)]
    pub struct MockLlmConnector;

    #[async_trait]
    impl LlmConnector for MockLlmConnector {
        async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ConnectorError> {
            let query = messages
                .iter()
                .rev()
                .find(|m| m.role == PromptRole::User)
                .map(|m| m.content.as_str())
                .unwrap_or_default();

            Ok(format!(
                "This is a mock response to: '{}'. The backend is running in lightweight mode.",
                query
            ))
        }

        async fn health(&self) -> Result<(), ConnectorError> {
            Ok(())
        }
    }
}

pub fn init(connector_config: &ConnectorConfig) -> Arc<dyn LlmConnector> {
    if let Some(config) = connector_config
        .llm_service
        .as_ref()
        .filter(|cfg| cfg.enabled)
    {
        match OllamaClient::new(config.clone()) {
            Ok(client) => {
                tracing::info!(
                    "LLM connector initialized ({}, model {})",
                    config.base_url,
                    config.model
                );
                return Arc::new(client);
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to initialize LLM connector, falling back to mock");
            }
        }
    } else {
        tracing::warn!("LLM connector disabled - using mock responses");
    }

    Arc::new(mock::MockLlmConnector)
}
