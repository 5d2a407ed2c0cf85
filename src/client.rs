//! Mistral API client.
//!
//! The public surface is [`MistralClient`] and its builder; request plumbing is
//! split into submodules under `src/client/`.

pub mod builder;
pub mod chat;
pub mod config;
pub mod core;

pub use builder::MistralClientBuilder;
pub use config::ClientConfig;
pub use core::MistralClient;
