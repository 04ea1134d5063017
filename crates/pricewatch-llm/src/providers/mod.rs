//! Concrete LLM provider implementations
//!
//! Each provider is gated behind its own feature flag so downstream crates
//! only pull in what they use.

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;

#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};
