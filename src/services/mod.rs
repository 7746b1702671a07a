pub mod chatbot;
pub mod documents;
pub mod memory;
pub mod pdf;
pub mod prompt;
pub mod session_registry;
pub mod templates;

pub use chatbot::{ChatbotError, LegalChatbot};
pub use documents::{DocumentError, DocumentGenerator, GeneratedDocument};
pub use memory::{ConversationMemory, MemoryMessage};
pub use session_registry::{Conversation, DocumentDraft, SessionRegistry};
pub use templates::{TemplateCatalog, TemplateError};
