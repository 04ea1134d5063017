//! Single-ticker price alert agent
//!
//! Polls one stock ticker on a schedule, appends every observation to a CSV
//! price log, and when the price drops below a configured threshold sends an
//! email alert - optionally enriched with recent headlines and a short AI
//! explanation of the move. A cooldown keeps a persistent dip from flooding
//! the inbox.
//!
//! # Architecture
//!
//! The loop ([`PriceWatcher`]) talks to four collaborators through traits:
//!
//! - [`PriceSource`]: latest trade price (Yahoo Finance)
//! - [`NewsSource`]: recent headlines (Finnhub)
//! - [`Analyst`]: natural-language explanation (any `pricewatch-llm` provider)
//! - [`Notifier`]: alert delivery (HTTP email API)
//!
//! News and analysis are optional; the agent degrades to a plain price alert
//! without them.
//!
//! # Example
//!
//! ```rust,ignore
//! use pricewatch_agent::{PriceWatcher, WatchConfig};
//! use pricewatch_agent::api::YahooFinanceClient;
//! use pricewatch_agent::notify::{EmailConfig, EmailNotifier};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WatchConfig::builder()
//!         .symbol("META")
//!         .threshold(700.0)
//!         .build()?;
//!
//!     let notifier = Arc::new(EmailNotifier::new(EmailConfig::from_env()?)?);
//!     let mut watcher = PriceWatcher::new(config, Arc::new(YahooFinanceClient::new()), notifier);
//!
//!     watcher.run().await;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod notify;
pub mod observation;
pub mod price_log;
pub mod prompts;
pub mod schedule;
pub mod sources;
pub mod watcher;

// Re-export main types for convenience
pub use analysis::{Analyst, LlmAnalyst};
pub use config::WatchConfig;
pub use cooldown::CooldownGate;
pub use error::{Result, WatchError};
pub use notify::{AlertMessage, Notifier};
pub use observation::Observation;
pub use price_log::PriceLog;
pub use schedule::Schedule;
pub use sources::{Headline, NewsSource, PriceQuote, PriceSource};
pub use watcher::{PriceWatcher, TickOutcome};
