//! Alert notification delivery
//!
//! The `Notifier` trait is the seam between the loop and the transport; the
//! loop never learns how a message travels, only whether the send succeeded.

mod email;

pub use email::{EmailConfig, EmailNotifier};

use crate::error::Result;
use crate::observation::Observation;
use crate::sources::Headline;
use async_trait::async_trait;
use std::time::Duration;

/// Sink for alert notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert message
    ///
    /// A failure must not advance any alert state; the loop retries on the
    /// next eligible tick.
    async fn send(&self, message: &AlertMessage) -> Result<()>;
}

/// A composed alert, ready for any transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    /// Compose the alert for a triggering observation
    ///
    /// `analysis` and `headlines` are optional context; the body always
    /// carries the price, threshold, below-by figures, timestamp and the
    /// cooldown note.
    pub fn compose(
        observation: &Observation,
        threshold: f64,
        cooldown: Duration,
        analysis: Option<&str>,
        headlines: &[Headline],
    ) -> Self {
        let below_by = observation.below_by(threshold);
        let subject = format!(
            "🔴 {} alert: ${:.2} dropped below ${:.2}",
            observation.symbol, observation.price, threshold
        );

        let mut body = format!(
            "Hi there,\n\n\
Your {} price alert has been triggered.\n\n\
  Current Price : ${:.2}\n\
  Your Target   : below ${:.2}\n\
  Below by      : ${:.2}  ({:.2}%)\n\
  Time          : {} UTC\n",
            observation.symbol,
            observation.price,
            threshold,
            below_by,
            below_by / threshold * 100.0,
            observation.timestamp.format("%Y-%m-%d %H:%M:%S"),
        );

        if let Some(analysis) = analysis {
            body.push_str("\nWhy the move:\n");
            body.push_str(analysis);
            body.push('\n');
        }

        if !headlines.is_empty() {
            body.push_str("\nRecent headlines:\n");
            for headline in headlines {
                body.push_str(&format!(
                    "  - {} ({}, {})\n    {}\n",
                    headline.title,
                    headline.source,
                    headline.published_at.format("%Y-%m-%d"),
                    headline.url,
                ));
            }
        }

        body.push_str(&format!(
            "\nThis is an automated alert from pricewatch.\n\
It won't send another alert for {} minutes.\n",
            cooldown.as_secs() / 60
        ));

        Self { subject, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn observation() -> Observation {
        Observation {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 5, 14, 30, 0).unwrap(),
            symbol: "META".to_string(),
            price: 695.0,
            below_threshold: true,
        }
    }

    #[test]
    fn test_compose_minimal() {
        let message = AlertMessage::compose(
            &observation(),
            700.0,
            Duration::from_secs(3600),
            None,
            &[],
        );

        assert_eq!(
            message.subject,
            "🔴 META alert: $695.00 dropped below $700.00"
        );
        assert!(message.body.contains("Current Price : $695.00"));
        assert!(message.body.contains("Below by      : $5.00  (0.71%)"));
        assert!(message.body.contains("2026-08-05 14:30:00 UTC"));
        assert!(message.body.contains("another alert for 60 minutes"));
        assert!(!message.body.contains("Why the move"));
        assert!(!message.body.contains("Recent headlines"));
    }

    #[test]
    fn test_compose_with_context() {
        let headlines = vec![Headline {
            title: "Meta slides after earnings".to_string(),
            description: String::new(),
            source: "Wire".to_string(),
            published_at: Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap(),
            url: "https://example.com/meta".to_string(),
        }];

        let message = AlertMessage::compose(
            &observation(),
            700.0,
            Duration::from_secs(1800),
            Some("Earnings disappointed."),
            &headlines,
        );

        assert!(message.body.contains("Why the move:\nEarnings disappointed."));
        assert!(message.body.contains("Meta slides after earnings"));
        assert!(message.body.contains("https://example.com/meta"));
        assert!(message.body.contains("another alert for 30 minutes"));
    }
}
