//! The alert loop
//!
//! One tick runs fetch → log → threshold guard → cooldown guard → gather
//! context → send, strictly in that order. Collaborator failures are
//! absorbed here: a failed price fetch ends the tick, failed news or
//! analysis degrade the alert, and a failed send leaves the cooldown
//! untouched so the next eligible tick retries.

use crate::analysis::Analyst;
use crate::config::WatchConfig;
use crate::cooldown::CooldownGate;
use crate::error::WatchError;
use crate::notify::{AlertMessage, Notifier};
use crate::observation::{Observation, PriceDelta};
use crate::price_log::PriceLog;
use crate::sources::{NewsSource, PriceSource};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const ANALYSIS_FALLBACK: &str = "No analysis is available for this alert.";

/// What a single tick decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Price fetch failed; nothing was logged or sent
    FetchFailed,

    /// Price at or above the threshold, no action
    AboveThreshold,

    /// Below threshold but a recent alert is still cooling down
    CooldownActive { remaining: Duration },

    /// Alert notification sent successfully
    AlertSent,

    /// Below threshold and eligible, but delivery failed
    SendFailed,
}

/// The monitoring agent: polls, evaluates, and notifies
pub struct PriceWatcher {
    config: WatchConfig,
    price_source: Arc<dyn PriceSource>,
    news_source: Option<Arc<dyn NewsSource>>,
    analyst: Option<Arc<dyn Analyst>>,
    notifier: Arc<dyn Notifier>,
    price_log: Option<PriceLog>,
    cooldown: CooldownGate,
    prev_price: Option<f64>,
}

impl PriceWatcher {
    /// Create a watcher with the required collaborators
    ///
    /// News and analysis are optional; see [`Self::with_news_source`] and
    /// [`Self::with_analyst`].
    pub fn new(
        config: WatchConfig,
        price_source: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cooldown = CooldownGate::new(config.cooldown);
        let price_log = config.log_path.clone().map(PriceLog::new);

        Self {
            config,
            price_source,
            news_source: None,
            analyst: None,
            notifier,
            price_log,
            cooldown,
            prev_price: None,
        }
    }

    /// Attach a news source for alert context
    pub fn with_news_source(mut self, news_source: Arc<dyn NewsSource>) -> Self {
        self.news_source = Some(news_source);
        self
    }

    /// Attach an analyst for alert explanations
    pub fn with_analyst(mut self, analyst: Arc<dyn Analyst>) -> Self {
        self.analyst = Some(analyst);
        self
    }

    /// The watcher's configuration
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Time of the last successfully sent alert, if any
    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        self.cooldown.last_alert()
    }

    /// Run the loop until an interrupt signal arrives
    pub async fn run(&mut self) {
        let schedule = self.config.schedule;
        let mut delay = schedule.initial_delay(Utc::now());

        loop {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }

            self.tick().await;
            delay = schedule.next_delay(Utc::now());
        }
    }

    /// Run one tick at the current time
    pub async fn tick(&mut self) -> TickOutcome {
        self.tick_at(Utc::now()).await
    }

    /// Run one tick as of `now`
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let quote = match self.price_source.latest_price(&self.config.symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                error!("Could not fetch price: {e}");
                return TickOutcome::FetchFailed;
            }
        };

        let observation = Observation::record(&quote, self.config.threshold, now);
        let delta = self
            .prev_price
            .map(|prev| PriceDelta::between(prev, observation.price));
        self.prev_price = Some(observation.price);

        let status = if observation.below_threshold {
            "BELOW threshold"
        } else {
            "above threshold"
        };
        match delta {
            Some(delta) => info!(
                "{}: ${:.2}  {}  -  {}",
                observation.symbol, observation.price, delta, status
            ),
            None => info!(
                "{}: ${:.2}  -  {}",
                observation.symbol, observation.price, status
            ),
        }

        if let Some(log) = &self.price_log {
            if let Err(e) = log.append(&observation) {
                warn!("Could not append to price log: {e}");
            }
        }

        if !observation.below_threshold {
            return TickOutcome::AboveThreshold;
        }

        if !self.cooldown.ready(now) {
            let remaining = self.cooldown.remaining(now).unwrap_or_default();
            info!(
                "Cooldown active - next alert possible in {}m {}s",
                remaining.as_secs() / 60,
                remaining.as_secs() % 60
            );
            return TickOutcome::CooldownActive { remaining };
        }

        info!(
            "${:.2} is below ${:.2} - sending alert",
            observation.price, self.config.threshold
        );
        self.notify(&observation, now).await
    }

    async fn notify(&mut self, observation: &Observation, now: DateTime<Utc>) -> TickOutcome {
        let headlines = match &self.news_source {
            Some(source) => match source
                .recent_headlines(&observation.symbol, self.config.news_limit)
                .await
            {
                Ok(headlines) => headlines,
                Err(e) => {
                    warn!("News fetch failed, continuing without headlines: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let analysis = match &self.analyst {
            Some(analyst) => Some(
                match analyst
                    .explain_drop(observation, self.config.threshold, &headlines)
                    .await
                {
                    Ok(text) if !text.is_empty() => text,
                    Ok(_) => ANALYSIS_FALLBACK.to_string(),
                    Err(e) => {
                        warn!("Analysis failed, using fallback text: {e}");
                        ANALYSIS_FALLBACK.to_string()
                    }
                },
            ),
            None => None,
        };

        let message = AlertMessage::compose(
            observation,
            self.config.threshold,
            self.config.cooldown,
            analysis.as_deref(),
            &headlines,
        );

        match self.notifier.send(&message).await {
            Ok(()) => {
                self.cooldown.mark_sent(now);
                info!("Alert sent");
                TickOutcome::AlertSent
            }
            Err(WatchError::AuthenticationFailed { service }) => {
                error!(
                    "Authentication failed for {service} - check the configured API key; \
                     the alert will be retried on the next eligible tick"
                );
                TickOutcome::SendFailed
            }
            Err(e) => {
                error!("Failed to send alert: {e}");
                TickOutcome::SendFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::schedule::Schedule;
    use crate::sources::{Headline, MockPriceSource, PriceQuote};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedPrices {
        prices: Mutex<VecDeque<f64>>,
    }

    impl ScriptedPrices {
        fn new(prices: &[f64]) -> Arc<Self> {
            Arc::new(Self {
                prices: Mutex::new(prices.iter().copied().collect()),
            })
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedPrices {
        async fn latest_price(&self, symbol: &str) -> Result<PriceQuote> {
            let price = self
                .prices
                .lock()
                .unwrap()
                .pop_front()
                .expect("price script exhausted");
            Ok(PriceQuote {
                symbol: symbol.to_string(),
                price,
                timestamp: Utc::now(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<AlertMessage>>,
        fail_next: Mutex<usize>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Fail the next `count` sends, then succeed
        fn failing(count: usize) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail_next: Mutex::new(count),
            })
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn messages(&self) -> Vec<AlertMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &AlertMessage) -> Result<()> {
            let mut fail_next = self.fail_next.lock().unwrap();
            if *fail_next > 0 {
                *fail_next -= 1;
                return Err(WatchError::Notification("delivery refused".to_string()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct StaticNews(Vec<Headline>);

    #[async_trait]
    impl NewsSource for StaticNews {
        async fn recent_headlines(&self, _symbol: &str, limit: usize) -> Result<Vec<Headline>> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    struct FailingNews;

    #[async_trait]
    impl NewsSource for FailingNews {
        async fn recent_headlines(&self, _symbol: &str, _limit: usize) -> Result<Vec<Headline>> {
            Err(WatchError::NewsSource("quota exhausted".to_string()))
        }
    }

    struct StaticAnalyst(&'static str);

    #[async_trait]
    impl Analyst for StaticAnalyst {
        async fn explain_drop(
            &self,
            _observation: &Observation,
            _threshold: f64,
            _headlines: &[Headline],
        ) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingAnalyst;

    #[async_trait]
    impl Analyst for FailingAnalyst {
        async fn explain_drop(
            &self,
            _observation: &Observation,
            _threshold: f64,
            _headlines: &[Headline],
        ) -> Result<String> {
            Err(WatchError::Analysis("model unavailable".to_string()))
        }
    }

    fn config(threshold: f64) -> WatchConfig {
        WatchConfig::builder()
            .symbol("META")
            .threshold(threshold)
            .schedule(Schedule::every(Duration::from_secs(60)))
            .cooldown(Duration::from_secs(3600))
            .build()
            .unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
    }

    fn headline(title: &str) -> Headline {
        Headline {
            title: title.to_string(),
            description: String::new(),
            source: "Wire".to_string(),
            published_at: at(0),
            url: "https://example.com/article".to_string(),
        }
    }

    #[tokio::test]
    async fn test_never_notifies_at_or_above_threshold() {
        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[700.0, 812.4, 700.01]),
            notifier.clone(),
        );

        for i in 0..3 {
            let outcome = watcher.tick_at(at(i * 60)).await;
            assert_eq!(outcome, TickOutcome::AboveThreshold);
        }
        assert_eq!(notifier.sent_count(), 0);
        assert!(watcher.last_alert().is_none());
    }

    #[tokio::test]
    async fn test_first_below_threshold_sends() {
        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[695.0]),
            notifier.clone(),
        );

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::AlertSent);
        assert_eq!(notifier.sent_count(), 1);
        assert_eq!(watcher.last_alert(), Some(at(0)));
    }

    #[tokio::test]
    async fn test_cooldown_suppresses_then_reopens() {
        // Worked example: threshold 700.00, cooldown 3600s.
        // t0 = 695.00 -> send #1; t0+600s = 690.00 -> cooldown active;
        // t0+3700s = 685.00 -> send #2.
        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[695.0, 690.0, 685.0]),
            notifier.clone(),
        );

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::AlertSent);
        assert_eq!(
            watcher.tick_at(at(600)).await,
            TickOutcome::CooldownActive {
                remaining: Duration::from_secs(3000)
            }
        );
        assert_eq!(watcher.tick_at(at(3700)).await, TickOutcome::AlertSent);

        assert_eq!(notifier.sent_count(), 2);
        assert_eq!(watcher.last_alert(), Some(at(3700)));
    }

    #[tokio::test]
    async fn test_failed_send_does_not_advance_cooldown() {
        let notifier = RecordingNotifier::failing(1);
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[695.0, 694.5]),
            notifier.clone(),
        );

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::SendFailed);
        assert!(watcher.last_alert().is_none());

        // Well inside the cooldown window, but nothing was sent, so the
        // next below-threshold tick retries.
        assert_eq!(watcher.tick_at(at(60)).await, TickOutcome::AlertSent);
        assert_eq!(notifier.sent_count(), 1);
        assert_eq!(watcher.last_alert(), Some(at(60)));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_absorbed() {
        let mut source = MockPriceSource::new();
        source
            .expect_latest_price()
            .returning(|_| Err(WatchError::PriceSource("no data".to_string())));

        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(config(700.0), Arc::new(source), notifier.clone());

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::FetchFailed);
        assert_eq!(notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_log_rows_match_ticks() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("prices.csv");

        let notifier = RecordingNotifier::new();
        let config = WatchConfig::builder()
            .symbol("META")
            .threshold(700.0)
            .cooldown(Duration::from_secs(3600))
            .log_path(&log_path)
            .build()
            .unwrap();
        let mut watcher = PriceWatcher::new(
            config,
            ScriptedPrices::new(&[695.0, 705.0, 698.0]),
            notifier.clone(),
        );

        watcher.tick_at(at(0)).await;
        watcher.tick_at(at(60)).await;
        watcher.tick_at(at(120)).await;

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "timestamp,symbol,price,below_threshold");
        assert!(lines[1].ends_with("META,695.00,true"));
        assert!(lines[2].ends_with("META,705.00,false"));
        assert!(lines[3].ends_with("META,698.00,true"));
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_no_log_row() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("prices.csv");

        let mut source = MockPriceSource::new();
        source
            .expect_latest_price()
            .returning(|_| Err(WatchError::PriceSource("no data".to_string())));

        let config = WatchConfig::builder()
            .symbol("META")
            .threshold(700.0)
            .log_path(&log_path)
            .build()
            .unwrap();
        let mut watcher = PriceWatcher::new(config, Arc::new(source), RecordingNotifier::new());

        watcher.tick_at(at(0)).await;
        assert!(!log_path.exists());
    }

    #[tokio::test]
    async fn test_alert_carries_news_and_analysis() {
        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[695.0]),
            notifier.clone(),
        )
        .with_news_source(Arc::new(StaticNews(vec![headline(
            "Meta slides after earnings",
        )])))
        .with_analyst(Arc::new(StaticAnalyst("Earnings disappointed.")));

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::AlertSent);

        let messages = notifier.messages();
        assert!(messages[0].body.contains("Meta slides after earnings"));
        assert!(messages[0].body.contains("Earnings disappointed."));
    }

    #[tokio::test]
    async fn test_news_failure_degrades_to_empty() {
        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[695.0]),
            notifier.clone(),
        )
        .with_news_source(Arc::new(FailingNews));

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::AlertSent);
        assert!(!notifier.messages()[0].body.contains("Recent headlines"));
    }

    #[tokio::test]
    async fn test_analysis_failure_uses_fallback_text() {
        let notifier = RecordingNotifier::new();
        let mut watcher = PriceWatcher::new(
            config(700.0),
            ScriptedPrices::new(&[695.0]),
            notifier.clone(),
        )
        .with_analyst(Arc::new(FailingAnalyst));

        assert_eq!(watcher.tick_at(at(0)).await, TickOutcome::AlertSent);
        assert!(notifier.messages()[0].body.contains(ANALYSIS_FALLBACK));
    }
}
