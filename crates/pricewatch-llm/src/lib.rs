//! LLM provider abstraction for pricewatch
//!
//! This crate provides provider-agnostic abstractions for requesting
//! free-text completions from Large Language Models (LLMs). It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - Concrete provider implementations (behind feature flags)
//!
//! The alert agent only ever sends a single text prompt and reads back a
//! single text reply, so there is no tool-calling or multi-modal surface
//! here.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub mod providers;
