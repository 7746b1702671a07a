use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PREVIEW_CHARS: usize = 50;

/// Speaker of a memory message, stored as `human` / `ai`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    Ai,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Human => "human",
            MessageType::Ai => "ai",
        }
    }

    /// Maps a frontend role (`user` / `assistant`) to a message type
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            "user" => Some(MessageType::Human),
            "assistant" => Some(MessageType::Ai),
            _ => None,
        }
    }

    /// Frontend role for a stored type; anything but `human` reads back as `assistant`
    pub fn role_of(stored_type: &str) -> &'static str {
        if stored_type == MessageType::Human.as_str() {
            "user"
        } else {
            "assistant"
        }
    }
}

/// A persisted chat session header
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub preview: String,
}

/// A persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredMessage {
    pub id: i64,
    pub session_id: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A message about to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub message_type: MessageType,
    pub content: String,
}

impl NewMessage {
    pub fn new(message_type: MessageType, content: impl Into<String>) -> Self {
        Self {
            message_type,
            content: content.into(),
        }
    }
}

/// Session preview: the first human message (or the first message), at most 50 characters plus `...`
pub fn session_preview(messages: &[NewMessage]) -> String {
    let source = messages
        .iter()
        .find(|m| m.message_type == MessageType::Human)
        .or_else(|| messages.first());

    match source {
        Some(message) => truncate_preview(&message.content),
        None => "Empty chat".to_string(),
    }
}

fn truncate_preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_prefers_first_human_message() {
        let messages = vec![
            NewMessage::new(MessageType::Ai, "Hello, how can I help?"),
            NewMessage::new(MessageType::Human, "Tenant rights"),
            NewMessage::new(MessageType::Human, "Second question"),
        ];
        assert_eq!(session_preview(&messages), "Tenant rights");
    }

    #[test]
    fn preview_falls_back_to_first_message() {
        let messages = vec![NewMessage::new(MessageType::Ai, "Welcome back")];
        assert_eq!(session_preview(&messages), "Welcome back");
    }

    #[test]
    fn preview_truncates_on_character_boundaries() {
        let long = "न्याय".repeat(20);
        let preview = session_preview(&[NewMessage::new(MessageType::Human, long)]);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 53);
    }

    #[test]
    fn preview_keeps_exactly_fifty_characters() {
        let text = "a".repeat(50);
        let preview = session_preview(&[NewMessage::new(MessageType::Human, text.clone())]);
        assert_eq!(preview, text);
    }

    #[test]
    fn unknown_stored_types_read_back_as_assistant() {
        assert_eq!(MessageType::role_of("human"), "user");
        assert_eq!(MessageType::role_of("ai"), "assistant");
        assert_eq!(MessageType::role_of("unknown"), "assistant");
        assert_eq!(MessageType::from_role("system"), None);
    }
}
