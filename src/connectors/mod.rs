//! External Service Connectors
//!
//! Adapters for the services the assistant delegates to: the LLM server,
//! the passage retriever and the identity provider. Routes and services only
//! see the traits; the HTTP clients and mocks stay in this module.
//!
//! Each connector is selected in its `init` from `ConnectorConfig`: an
//! enabled block builds the HTTP client, a disabled (or broken) one falls
//! back to the mock so the server still runs in lightweight mode.

pub mod config;
pub mod errors;
pub mod identity_service;
pub mod llm_service;
pub mod retriever_service;

pub use config::{
    ConnectorConfig, IdentityServiceConfig, LlmServiceConfig, RetrieverServiceConfig,
};
pub use errors::ConnectorError;
pub use identity_service::{FirebaseIdentityClient, IdentityAccount, IdentityConnector};
pub use llm_service::{LlmConnector, OllamaClient, PromptMessage, PromptRole};
pub use retriever_service::{Passage, RetrieverClient, RetrieverConnector};

pub use identity_service::init as init_identity;
pub use llm_service::init as init_llm;
pub use retriever_service::init as init_retriever;
