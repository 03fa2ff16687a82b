//! Credit-gated chat relay: routes chat requests to an upstream LLM provider,
//! or answers from the offline responder when no provider is configured.

pub mod catalog;
pub mod config;
pub mod error;
pub mod offline;
pub mod provider;
pub mod relay;
pub mod web;

pub use config::Config;
pub use error::RelayError;
pub use relay::Relay;
