//! Yahoo Finance price source

use crate::error::{Result, WatchError};
use crate::sources::{PriceQuote, PriceSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
///
/// No API key required; the connector is created per request.
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    async fn fetch_latest(&self, symbol: &str) -> Result<PriceQuote> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| WatchError::PriceSource(e.to_string()))?;

        let response = provider
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| WatchError::PriceSource(e.to_string()))?;

        let quote = response
            .last_quote()
            .map_err(|e| WatchError::PriceSource(e.to_string()))?;

        Ok(PriceQuote {
            symbol: symbol.to_string(),
            price: round_price(quote.close),
            timestamp: DateTime::from_timestamp(quote.timestamp as i64, 0)
                .unwrap_or_else(Utc::now),
        })
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn latest_price(&self, symbol: &str) -> Result<PriceQuote> {
        self.fetch_latest(symbol).await
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a raw quote to 2 decimal places
fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_price() {
        assert_eq!(round_price(699.996), 700.0);
        assert_eq!(round_price(695.004_9), 695.0);
        assert_eq!(round_price(695.006), 695.01);
        assert_eq!(round_price(700.0), 700.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_latest_price() {
        let client = YahooFinanceClient::new();
        let quote = client.latest_price("AAPL").await;
        assert!(quote.is_ok());

        let quote = quote.unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert!(quote.price > 0.0);
    }
}
