use super::config::{ConnectorConfig, RetrieverServiceConfig};
use super::errors::ConnectorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// A chunk of legal reference text returned for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
}

#[async_trait]
pub trait RetrieverConnector: Send + Sync {
    /// Returns at most `top_k` passages relevant to `query`, best first
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Passage>, ConnectorError>;

    async fn health(&self) -> Result<(), ConnectorError>;
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Passage>,
}

/// HTTP client for the vector search service holding the legal corpus
pub struct RetrieverClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl RetrieverClient {
    pub fn new(config: RetrieverServiceConfig) -> Result<Self, ConnectorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConnectorError::Internal(err.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl RetrieverConnector for RetrieverClient {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Passage>, ConnectorError> {
        let span = tracing::info_span!("retriever_search", top_k);

        let resp = self
            .http_client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest { query, top_k })
            .send()
            .instrument(span)
            .await?
            .error_for_status()?;

        let mut results = resp
            .json::<SearchResponse>()
            .await
            .map_err(|err| ConnectorError::InvalidResponse(err.to_string()))?
            .results;
        results.truncate(top_k);

        Ok(results)
    }

    async fn health(&self) -> Result<(), ConnectorError> {
        self.http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub mod mock {
    use super::*;

    /// Retriever with an empty corpus
    #[derive(Default)]
    pub struct MockRetrieverConnector;

    #[async_trait]
    impl RetrieverConnector for MockRetrieverConnector {
        async fn retrieve(
            &self,
            _query: &str,
            _top_k: usize,
        ) -> Result<Vec<Passage>, ConnectorError> {
            Ok(Vec::new())
        }

        async fn health(&self) -> Result<(), ConnectorError> {
            Ok(())
        }
    }
}

pub fn init(connector_config: &ConnectorConfig) -> Arc<dyn RetrieverConnector> {
    if let Some(config) = connector_config
        .retriever_service
        .as_ref()
        .filter(|cfg| cfg.enabled)
    {
        match RetrieverClient::new(config.clone()) {
            Ok(client) => {
                tracing::info!("Retriever connector initialized ({})", config.base_url);
                return Arc::new(client);
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to initialize retriever connector, falling back to mock");
            }
        }
    } else {
        tracing::warn!("Retriever connector disabled - answers will have no retrieved context");
    }

    Arc::new(mock::MockRetrieverConnector)
}
