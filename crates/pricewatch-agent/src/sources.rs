//! Collaborator contracts for the alert loop
//!
//! The loop only ever talks to its collaborators through these traits, so
//! every decision path can be exercised with scripted fakes. Concrete
//! implementations live in [`crate::api`].

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

/// Latest trade price for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,

    /// Last trade price, rounded to 2 decimal places
    pub price: f64,

    /// Exchange timestamp of the quote
    pub timestamp: DateTime<Utc>,
}

/// A single news headline about the watched symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,

    /// Short description or summary (may be empty)
    pub description: String,

    /// Publisher name
    pub source: String,

    pub published_at: DateTime<Utc>,

    pub url: String,
}

/// Source of latest trade prices
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the latest price for a symbol
    ///
    /// Returns an error when the quote is unavailable; the loop absorbs the
    /// failure and waits for the next tick.
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote>;
}

/// Source of recent headlines for a symbol
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch up to `limit` recent headlines, newest first
    async fn recent_headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>>;
}
