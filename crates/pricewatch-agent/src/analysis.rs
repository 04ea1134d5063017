//! AI analysis of a triggered alert
//!
//! The analyst turns the triggering observation and any gathered headlines
//! into a short natural-language explanation. Failures are returned to the
//! loop, which substitutes a fallback string rather than dropping the alert.

use crate::error::Result;
use crate::observation::Observation;
use crate::prompts;
use crate::sources::Headline;
use async_trait::async_trait;
use pricewatch_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use tracing::debug;

const ANALYSIS_MAX_TOKENS: usize = 512;

/// Source of natural-language explanations for a triggered alert
#[async_trait]
pub trait Analyst: Send + Sync {
    /// Explain why the observed price sits below the threshold
    async fn explain_drop(
        &self,
        observation: &Observation,
        threshold: f64,
        headlines: &[Headline],
    ) -> Result<String>;
}

/// Analyst backed by an LLM provider
pub struct LlmAnalyst {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl LlmAnalyst {
    /// Create an analyst that asks `model` on the given provider
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Analyst for LlmAnalyst {
    async fn explain_drop(
        &self,
        observation: &Observation,
        threshold: f64,
        headlines: &[Headline],
    ) -> Result<String> {
        let request = CompletionRequest::builder(&self.model)
            .system(prompts::analyst_system())
            .add_message(Message::user(prompts::drop_context(
                observation,
                threshold,
                headlines,
            )))
            .max_tokens(ANALYSIS_MAX_TOKENS)
            .build();

        let response = self.provider.complete(request).await?;
        debug!(
            provider = self.provider.name(),
            tokens = response.usage.total(),
            "Analysis completion received"
        );

        Ok(response.text().trim().to_string())
    }
}
