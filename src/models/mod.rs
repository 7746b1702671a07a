pub mod chat;
pub mod template;
pub mod user;

pub use chat::*;
pub use template::*;
pub use user::*;
