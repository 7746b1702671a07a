use super::config::{ConnectorConfig, IdentityServiceConfig};
use super::errors::ConnectorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Account returned by the identity provider after sign up or sign in
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAccount {
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub id_token: String,
}

#[async_trait]
pub trait IdentityConnector: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str)
        -> Result<IdentityAccount, ConnectorError>;

    async fn sign_in(&self, email: &str, password: &str)
        -> Result<IdentityAccount, ConnectorError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsPayload<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Firebase Identity Toolkit REST client (email/password accounts)
pub struct FirebaseIdentityClient {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl FirebaseIdentityClient {
    pub fn new(config: IdentityServiceConfig) -> Result<Self, ConnectorError> {
        let api_key = config
            .api_key
            .ok_or_else(|| ConnectorError::Internal("FIREBASE_API_KEY is not set".to_string()))?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConnectorError::Internal(err.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    async fn post_credentials(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, ConnectorError> {
        let span = tracing::info_span!("identity_request", action = %action);
        let url = format!("{}/accounts:{}", self.base_url, action);

        let resp = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&CredentialsPayload {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .instrument(span)
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // The provider reports failures as {"error": {"message": "EMAIL_EXISTS", ...}}
            return Err(match serde_json::from_str::<ProviderErrorBody>(&body) {
                Ok(parsed) if status.is_client_error() => {
                    ConnectorError::Rejected(parsed.error.message)
                }
                Ok(parsed) => ConnectorError::HttpError(parsed.error.message),
                Err(_) => ConnectorError::HttpError(format!(
                    "identity provider returned {}",
                    status
                )),
            });
        }

        serde_json::from_str::<IdentityAccount>(&body)
            .map_err(|err| ConnectorError::InvalidResponse(err.to_string()))
    }
}

#[async_trait]
impl IdentityConnector for FirebaseIdentityClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, ConnectorError> {
        self.post_credentials("signUp", email, password).await
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, ConnectorError> {
        self.post_credentials("signInWithPassword", email, password).await
    }
}

pub mod mock {
    use super::*;
    use sha2::{Digest, Sha256};
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    struct MockAccount {
        local_id: String,
        password_digest: String,
    }

    /// In-process account store reproducing the provider's error codes
    #[derive(Default)]
    pub struct MockIdentityConnector {
        accounts: RwLock<HashMap<String, MockAccount>>,
    }

    fn digest(password: &str) -> String {
        format!("{:x}", Sha256::digest(password.as_bytes()))
    }

    fn issue(local_id: &str, email: &str) -> IdentityAccount {
        IdentityAccount {
            local_id: local_id.to_string(),
            email: email.to_string(),
            id_token: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    #[async_trait]
    impl IdentityConnector for MockIdentityConnector {
        async fn sign_up(
            &self,
            email: &str,
            password: &str,
        ) -> Result<IdentityAccount, ConnectorError> {
            let email = email.trim().to_lowercase();
            if !email.contains('@') {
                return Err(ConnectorError::Rejected("INVALID_EMAIL".to_string()));
            }
            if password.chars().count() < 6 {
                return Err(ConnectorError::Rejected(
                    "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
                ));
            }

            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&email) {
                return Err(ConnectorError::Rejected("EMAIL_EXISTS".to_string()));
            }

            let local_id = uuid::Uuid::new_v4().simple().to_string();
            accounts.insert(
                email.clone(),
                MockAccount {
                    local_id: local_id.clone(),
                    password_digest: digest(password),
                },
            );

            Ok(issue(&local_id, &email))
        }

        async fn sign_in(
            &self,
            email: &str,
            password: &str,
        ) -> Result<IdentityAccount, ConnectorError> {
            let email = email.trim().to_lowercase();
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&email)
                .ok_or_else(|| ConnectorError::Rejected("EMAIL_NOT_FOUND".to_string()))?;

            if account.password_digest != digest(password) {
                return Err(ConnectorError::Rejected("INVALID_PASSWORD".to_string()));
            }

            Ok(issue(&account.local_id, &email))
        }
    }
}

pub fn init(connector_config: &ConnectorConfig) -> Arc<dyn IdentityConnector> {
    if let Some(config) = connector_config
        .identity_service
        .as_ref()
        .filter(|cfg| cfg.enabled)
    {
        match FirebaseIdentityClient::new(config.clone()) {
            Ok(client) => {
                tracing::info!("Identity connector initialized ({})", config.base_url);
                return Arc::new(client);
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to initialize identity connector, falling back to mock");
            }
        }
    } else {
        tracing::warn!("Identity connector disabled - accounts live in memory only");
    }

    Arc::new(mock::MockIdentityConnector::default())
}
