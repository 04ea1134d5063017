//! Prompts for the alert analysis request

use crate::observation::Observation;
use crate::sources::Headline;

/// System prompt for the alert analyst
pub fn analyst_system() -> &'static str {
    "You are a market analyst writing a short note for a private investor's \
price alert email.

When explaining a price move:
1. Lead with the most likely driver of the drop
2. Use the provided headlines as evidence where they are relevant
3. Distinguish company-specific news from broad market moves
4. Keep it to two or three short paragraphs of plain prose

Be specific about prices and percentages. Never give buy or sell advice, \
and acknowledge uncertainty when the cause of the move is unclear."
}

/// User prompt describing the triggering observation and its context
pub fn drop_context(observation: &Observation, threshold: f64, headlines: &[Headline]) -> String {
    let mut prompt = format!(
        "{} is trading at ${:.2}, below the alert threshold of ${:.2} \
(${:.2} / {:.2}% under it), as of {} UTC.",
        observation.symbol,
        observation.price,
        threshold,
        observation.below_by(threshold),
        observation.below_by(threshold) / threshold * 100.0,
        observation.timestamp.format("%Y-%m-%d %H:%M:%S"),
    );

    if headlines.is_empty() {
        prompt.push_str("\n\nNo recent headlines are available.");
    } else {
        prompt.push_str("\n\nRecent headlines:");
        for headline in headlines {
            prompt.push_str(&format!(
                "\n- {} ({}, {})",
                headline.title,
                headline.source,
                headline.published_at.format("%Y-%m-%d"),
            ));
            if !headline.description.is_empty() {
                prompt.push_str(&format!("\n  {}", headline.description));
            }
        }
    }

    prompt.push_str("\n\nExplain the likely reason for the drop.");
    prompt
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
    fn test_drop_context_without_headlines() {
        let prompt = drop_context(&observation(), 700.0, &[]);
        assert!(prompt.contains("META is trading at $695.00"));
        assert!(prompt.contains("below the alert threshold of $700.00"));
        assert!(prompt.contains("No recent headlines"));
    }

    #[test]
    fn test_drop_context_lists_headlines() {
        let headlines = vec![Headline {
            title: "Meta shares slip on ad revenue worries".to_string(),
            description: "Analysts cut estimates".to_string(),
            source: "Wire".to_string(),
            published_at: Utc.with_ymd_and_hms(2026, 8, 5, 9, 0, 0).unwrap(),
            url: "https://example.com/meta".to_string(),
        }];

        let prompt = drop_context(&observation(), 700.0, &headlines);
        assert!(prompt.contains("Meta shares slip on ad revenue worries"));
        assert!(prompt.contains("Analysts cut estimates"));
    }
}
