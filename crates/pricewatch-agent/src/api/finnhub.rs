//! Finnhub news source

use crate::error::{Result, WatchError};
use crate::sources::{Headline, NewsSource};
use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const DEFAULT_LOOKBACK_DAYS: u64 = 7;

/// Finnhub news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubNewsArticle {
    /// Article category
    pub category: String,
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// Unique article ID
    pub id: i64,
    /// Related symbols
    pub related: String,
    /// News source
    pub source: String,
    /// Article summary
    pub summary: String,
    /// Article URL
    pub url: String,
}

/// Finnhub client for company news
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
    lookback_days: u64,
}

impl FinnhubClient {
    /// Create a new Finnhub client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (free tier: 60, premium: 300+)
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(60).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    /// Create a client from the `FINNHUB_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FINNHUB_API_KEY")
            .map_err(|_| WatchError::ConfigError("FINNHUB_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key, 60))
    }

    /// Set how many days back the news window reaches
    pub fn with_lookback_days(mut self, days: u64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Get company news for a symbol within the lookback window
    pub async fn company_news(&self, symbol: &str) -> Result<Vec<FinnhubNewsArticle>> {
        self.rate_limiter.until_ready().await;

        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_days(Days::new(self.lookback_days))
            .unwrap_or(to);

        let url = format!(
            "https://finnhub.io/api/v1/company-news?symbol={}&from={}&to={}&token={}",
            symbol, from, to, self.api_key
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WatchError::NewsSource(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            if status.as_u16() == 401 {
                return Err(WatchError::AuthenticationFailed {
                    service: "finnhub".to_string(),
                });
            }
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::NewsSource(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        response
            .json::<Vec<FinnhubNewsArticle>>()
            .await
            .map_err(|e| WatchError::NewsSource(format!("Failed to parse Finnhub response: {e}")))
    }
}

#[async_trait]
impl NewsSource for FinnhubClient {
    async fn recent_headlines(&self, symbol: &str, limit: usize) -> Result<Vec<Headline>> {
        let mut articles = self.company_news(symbol).await?;
        articles.sort_by(|a, b| b.datetime.cmp(&a.datetime));

        Ok(articles
            .into_iter()
            .take(limit)
            .map(|article| Headline {
                title: article.headline,
                description: article.summary,
                source: article.source,
                published_at: DateTime::from_timestamp(article.datetime, 0)
                    .unwrap_or_else(Utc::now),
                url: article.url,
            })
            .collect())
    }
}
