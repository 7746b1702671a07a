use crate::connectors::ConnectorConfig;
use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    /// Base URL clients use to reach this server, used to build download links.
    pub public_url: String,
    pub history: HistorySettings,
    pub sessions: SessionSettings,
    pub chatbot: ChatbotSettings,
    pub documents: DocumentSettings,
    #[serde(default)]
    pub connectors: ConnectorConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    /// Path of the SQLite database file
    pub path: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct HistorySettings {
    /// Number of sessions returned by `GET /chat/history` when no limit is given
    pub recent_limit: i64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SessionSettings {
    /// Conversations idle for longer than this are dropped. 0 keeps them forever.
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ChatbotSettings {
    pub system_prompt: String,
    /// Number of most recent memory messages included in the prompt
    pub memory_window: usize,
    /// Number of passages requested from the retriever
    pub top_k: usize,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DocumentSettings {
    pub templates_dir: String,
    pub output_dir: String,
}

impl DatabaseSettings {
    const fn default_max_connections() -> u32 {
        5
    }

    // Connection string: sqlite://<path>
    pub fn connection_string(&self) -> String {
        format!("sqlite://{}", self.path)
    }
}

impl Settings {
    pub fn download_url(&self, file_name: &str) -> String {
        download_url(&self.public_url, file_name)
    }
}

/// Public link of a generated document, served from `/generated_documents`
pub fn download_url(public_url: &str, file_name: &str) -> String {
    format!(
        "{}/generated_documents/{}",
        public_url.trim_end_matches('/'),
        file_name
    )
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        // .json, .toml, .yaml, .yml
        .add_source(config::File::with_name("configuration"))
        // LEGALAID__APP_PORT=9000, LEGALAID__DATABASE__PATH=..., etc.
        .add_source(
            config::Environment::with_prefix("LEGALAID")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    // The identity provider key is a secret and never lives in the yaml file
    if let Some(identity) = config.connectors.identity_service.as_mut() {
        if identity.api_key.is_none() {
            identity.api_key = std::env::var("FIREBASE_API_KEY").ok();
        }
    }

    Ok(config)
}
