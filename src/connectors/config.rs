use serde::{Deserialize, Serialize};

/// Configuration for external service connectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    pub llm_service: Option<LlmServiceConfig>,
    pub retriever_service: Option<RetrieverServiceConfig>,
    pub identity_service: Option<IdentityServiceConfig>,
}

/// LLM server connector configuration (Ollama-compatible chat API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmServiceConfig {
    /// Enable/disable the LLM server; the mock answers when disabled
    pub enabled: bool,
    /// Base URL of the model server (e.g., http://localhost:11434)
    pub base_url: String,
    /// Model name passed on every request
    pub model: String,
    #[serde(default = "LlmServiceConfig::default_temperature")]
    pub temperature: f32,
    /// HTTP request timeout in seconds. Generation is slow, keep this generous.
    pub timeout_secs: u64,
}

impl LlmServiceConfig {
    const fn default_temperature() -> f32 {
        0.2
    }
}

impl Default for LlmServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:11434".to_string(),
            model: "llama2".to_string(),
            temperature: Self::default_temperature(),
            timeout_secs: 120,
        }
    }
}

/// Passage retrieval service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverServiceConfig {
    pub enabled: bool,
    /// Base URL of the retrieval service (e.g., http://localhost:8100)
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RetrieverServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8100".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Identity provider configuration (Firebase Identity Toolkit REST API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityServiceConfig {
    pub enabled: bool,
    /// Base URL of the accounts API
    pub base_url: String,
    pub timeout_secs: u64,
    /// Web API key (from env: FIREBASE_API_KEY)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for IdentityServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            timeout_secs: 10,
            api_key: None,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            llm_service: Some(LlmServiceConfig::default()),
            retriever_service: Some(RetrieverServiceConfig::default()),
            identity_service: Some(IdentityServiceConfig::default()),
        }
    }
}
