pub(crate) mod auth;
pub(crate) mod chat;
pub(crate) mod document;
pub mod health_checks;
pub(crate) mod session;
pub(crate) mod templates;

pub use health_checks::*;
