use crate::models::{MessageType, NewMessage};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
}

/// Ordered transcript of one user's live conversation
#[derive(Debug, Default, Clone)]
pub struct ConversationMemory {
    history: Vec<MemoryMessage>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.push(MessageType::Human, content);
    }

    pub fn add_assistant_response(&mut self, content: impl Into<String>) {
        self.push(MessageType::Ai, content);
    }

    pub fn push(&mut self, message_type: MessageType, content: impl Into<String>) {
        self.history.push(MemoryMessage {
            message_type,
            content: content.into(),
        });
    }

    pub fn get_history(&self) -> &[MemoryMessage] {
        &self.history
    }

    /// The last `size` messages
    pub fn window(&self, size: usize) -> &[MemoryMessage] {
        let start = self.history.len().saturating_sub(size);
        &self.history[start..]
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Snapshot in the shape the history store persists
    pub fn to_new_messages(&self) -> Vec<NewMessage> {
        self.history
            .iter()
            .map(|m| NewMessage::new(m.message_type, m.content.clone()))
            .collect()
    }
}
