use serde::Deserialize;
use serde_valid::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(min_length = 1)]
    #[validate(max_length = 8000)]
    pub user_query: String,
    #[serde(default = "super::default_user_id")]
    #[validate(min_length = 1)]
    #[validate(max_length = 128)]
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveChatRequest {
    #[serde(default = "super::default_user_id")]
    #[validate(min_length = 1)]
    #[validate(max_length = 128)]
    pub user_id: String,
    /// Session being replaced by this save
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetRequest {
    #[serde(default = "super::default_user_id")]
    #[validate(min_length = 1)]
    #[validate(max_length = 128)]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RestoreRequest {
    #[validate(min_length = 1)]
    #[validate(max_length = 128)]
    pub user_id: String,
    pub messages: Vec<RoleMessage>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "super::default_user_id")]
    pub user_id: String,
    pub limit: Option<i64>,
}
