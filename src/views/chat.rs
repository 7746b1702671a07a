use crate::models::{self, MessageType};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
}

/// `status` plus an optional message / session id, as the frontend expects
#[derive(Debug, Serialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl StatusReply {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            message: None,
            session_id: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_session(mut self, session_id: String) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub preview: String,
}

impl From<models::ChatSession> for SessionSummary {
    fn from(session: models::ChatSession) -> Self {
        Self {
            session_id: session.session_id,
            timestamp: session.created_at,
            preview: session.preview,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionList {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct RoleMessage {
    pub role: &'static str,
    pub content: String,
}

impl From<models::StoredMessage> for RoleMessage {
    fn from(message: models::StoredMessage) -> Self {
        Self {
            role: MessageType::role_of(&message.message_type),
            content: message.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub messages: Vec<RoleMessage>,
}
