use super::memory::ConversationMemory;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, PartialEq)]
pub struct DraftField {
    pub name: String,
    /// Question shown to the user
    pub prompt: String,
}

/// A guided document fill in progress
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub template_id: String,
    pub template_title: String,
    /// Fields still to ask for, in template order
    pub pending_fields: Vec<DraftField>,
    pub values: Vec<(String, String)>,
    /// What the user originally asked for
    pub request: String,
}

impl DocumentDraft {
    pub fn current_field(&self) -> Option<&DraftField> {
        self.pending_fields.first()
    }
}

/// Live state of one user's chat
#[derive(Debug)]
pub struct Conversation {
    pub memory: ConversationMemory,
    pub document_draft: Option<DocumentDraft>,
    last_active: Instant,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            memory: ConversationMemory::new(),
            document_draft: None,
            last_active: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn clear_document_state(&mut self) {
        self.document_draft = None;
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// user_id -> conversation. One user's turns are serialized by the conversation mutex.
#[derive(Default)]
pub struct SessionRegistry {
    conversations: RwLock<HashMap<String, ConversationHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_create(&self, user_id: &str) -> ConversationHandle {
        if let Some(handle) = self.conversations.read().await.get(user_id) {
            return handle.clone();
        }

        let mut conversations = self.conversations.write().await;
        conversations
            .entry(user_id.to_string())
            .or_insert_with(|| {
                tracing::info!(%user_id, "Creating new conversation");
                Arc::new(Mutex::new(Conversation::new()))
            })
            .clone()
    }

    /// Drops conversations idle for longer than `ttl`. Conversations in use are kept.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|_, handle| {
            // a handler cloned the handle and has not locked it yet
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(conversation) => conversation.idle_for() <= ttl,
                Err(_) => true,
            }
        });
        before - conversations.len()
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

/// Periodically evicts idle conversations; a zero ttl disables the sweeper
pub fn spawn_idle_sweeper(registry: Arc<SessionRegistry>, ttl: Duration, every: Duration) {
    if ttl.is_zero() || every.is_zero() {
        tracing::debug!("Idle conversation sweeper disabled");
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = registry.evict_idle(ttl).await;
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle conversations");
            }
        }
    });
}
