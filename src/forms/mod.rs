pub mod chat;
pub mod document;
pub mod user;

pub use chat::*;
pub use document::*;
pub use user::*;

pub(crate) fn default_user_id() -> String {
    "default_user".to_string()
}
