//! Per-tick price observations

use crate::sources::PriceQuote;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed price, created once per tick and never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// When the observation was made (not the exchange timestamp)
    pub timestamp: DateTime<Utc>,

    pub symbol: String,

    pub price: f64,

    /// Whether the price was below the alert threshold at observation time
    pub below_threshold: bool,
}

impl Observation {
    /// Record an observation from a quote against the configured threshold
    pub fn record(quote: &PriceQuote, threshold: f64, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            symbol: quote.symbol.clone(),
            price: quote.price,
            below_threshold: quote.price < threshold,
        }
    }

    /// Amount the price sits below the threshold (positive when triggered)
    pub fn below_by(&self, threshold: f64) -> f64 {
        threshold - self.price
    }
}

/// Change of the observed price against the previous tick
#[derive(Debug, Clone, Copy)]
pub struct PriceDelta {
    change: f64,
    percent: f64,
}

impl PriceDelta {
    /// Delta from `prev` to `current`
    pub fn between(prev: f64, current: f64) -> Self {
        let change = current - prev;
        Self {
            change,
            percent: (change / prev) * 100.0,
        }
    }
}

impl fmt::Display for PriceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.change >= 0.0 { '▲' } else { '▼' };
        write!(
            f,
            "{arrow} ${:.2} ({:.2}%)",
            self.change.abs(),
            self.percent.abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(price: f64) -> PriceQuote {
        PriceQuote {
            symbol: "META".to_string(),
            price,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_below_threshold_flag() {
        let now = Utc::now();
        let obs = Observation::record(&quote(695.0), 700.0, now);
        assert!(obs.below_threshold);
        assert_eq!(obs.below_by(700.0), 5.0);

        let obs = Observation::record(&quote(700.0), 700.0, now);
        assert!(!obs.below_threshold);

        let obs = Observation::record(&quote(712.5), 700.0, now);
        assert!(!obs.below_threshold);
    }

    #[test]
    fn test_price_delta_display() {
        let up = PriceDelta::between(700.0, 703.5);
        assert_eq!(up.to_string(), "▲ $3.50 (0.50%)");

        let down = PriceDelta::between(700.0, 693.0);
        assert_eq!(down.to_string(), "▼ $7.00 (1.00%)");
    }
}
