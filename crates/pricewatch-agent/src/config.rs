//! Configuration for the alert agent
//!
//! Built once at startup and passed into the loop; nothing here changes for
//! the lifetime of the process. Credentials for the email, news and LLM
//! collaborators are read from the environment by their respective clients,
//! not stored here.

use crate::error::{Result, WatchError};
use crate::schedule::Schedule;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the alert loop
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Ticker symbol to watch
    pub symbol: String,

    /// Send an alert when the price drops below this value
    pub threshold: f64,

    /// When the loop ticks
    pub schedule: Schedule,

    /// Minimum time between two alert notifications
    pub cooldown: Duration,

    /// Where to append observed prices, `None` disables logging
    pub log_path: Option<PathBuf>,

    /// Maximum number of headlines to include in an alert
    pub news_limit: usize,
}

impl WatchConfig {
    /// Create a new configuration builder
    pub fn builder() -> WatchConfigBuilder {
        WatchConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(WatchError::ConfigError(
                "symbol must not be empty".to_string(),
            ));
        }

        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(WatchError::ConfigError(format!(
                "threshold must be a positive price, got {}",
                self.threshold
            )));
        }

        if let Schedule::Every(interval) = self.schedule {
            if interval.is_zero() {
                return Err(WatchError::ConfigError(
                    "poll interval must be greater than zero".to_string(),
                ));
            }
        }

        if self.news_limit == 0 {
            return Err(WatchError::ConfigError(
                "news_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for WatchConfig
#[derive(Debug, Default)]
pub struct WatchConfigBuilder {
    symbol: Option<String>,
    threshold: Option<f64>,
    schedule: Option<Schedule>,
    cooldown: Option<Duration>,
    log_path: Option<PathBuf>,
    news_limit: Option<usize>,
}

impl WatchConfigBuilder {
    /// Set the ticker symbol
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into().to_uppercase());
        self
    }

    /// Set the alert threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the tick schedule
    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Set the cooldown between notifications
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Set the price log path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Set the maximum number of headlines per alert
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<WatchConfig> {
        let symbol = self
            .symbol
            .ok_or_else(|| WatchError::ConfigError("symbol is required".to_string()))?;
        let threshold = self
            .threshold
            .ok_or_else(|| WatchError::ConfigError("threshold is required".to_string()))?;

        let config = WatchConfig {
            symbol,
            threshold,
            schedule: self
                .schedule
                .unwrap_or(Schedule::Every(Duration::from_secs(60))),
            cooldown: self.cooldown.unwrap_or(Duration::from_secs(3600)),
            log_path: self.log_path,
            news_limit: self.news_limit.unwrap_or(5),
        };

        config.validate()?;
        Ok(config)
    }
}
