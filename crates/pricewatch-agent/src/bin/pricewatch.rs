//! Price alert agent CLI
//!
//! Watches one ticker and emails an alert when the price drops below the
//! threshold.
//!
//! # Usage
//!
//! ```bash
//! # Required email transport
//! export EMAIL_API_KEY="re_..."
//! export EMAIL_SENDER="alerts@example.com"
//! export EMAIL_RECEIVER="you@example.com"
//!
//! # Optional context collaborators
//! export FINNHUB_API_KEY="..."        # headlines in the alert
//! export ANTHROPIC_API_KEY="sk-ant-..." # AI explanation of the move
//!
//! cargo run --bin pricewatch -- --symbol META --threshold 700
//! ```

use anyhow::Context;
use chrono_tz::Tz;
use clap::Parser;
use pricewatch_agent::api::{FinnhubClient, YahooFinanceClient};
use pricewatch_agent::notify::{EmailConfig, EmailNotifier};
use pricewatch_agent::{LlmAnalyst, PriceWatcher, Schedule, WatchConfig};
use pricewatch_llm::providers::{AnthropicProvider, OpenAIProvider};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Parser)]
#[command(name = "pricewatch", about = "Single-ticker price alert agent")]
struct Cli {
    /// Ticker symbol to watch
    #[arg(long, default_value = "META")]
    symbol: String,

    /// Send an alert when the price drops below this value
    #[arg(long, default_value_t = 700.0)]
    threshold: f64,

    /// Seconds between price checks
    #[arg(long, default_value_t = 60)]
    interval: u64,

    /// Check once per day at this wall-clock time (HH:MM) instead of polling
    #[arg(long, value_name = "HH:MM")]
    daily_at: Option<String>,

    /// IANA timezone for --daily-at
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Seconds to wait before sending another alert
    #[arg(long, default_value_t = 3600)]
    cooldown: u64,

    /// CSV file to append observed prices to
    #[arg(long, default_value = "price_log.csv")]
    log_file: PathBuf,

    /// Disable the price log entirely
    #[arg(long)]
    no_log: bool,

    /// Maximum number of headlines to include in an alert
    #[arg(long, default_value_t = 5)]
    news_limit: usize,
}

fn build_schedule(cli: &Cli) -> anyhow::Result<Schedule> {
    match &cli.daily_at {
        None => Ok(Schedule::every(Duration::from_secs(cli.interval))),
        Some(time) => {
            let (hour, minute) = parse_daily_time(time)?;
            let timezone: Tz = cli
                .timezone
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {e}", cli.timezone))?;
            Ok(Schedule::daily_at(hour, minute, timezone)?)
        }
    }
}

fn parse_daily_time(time: &str) -> anyhow::Result<(u32, u32)> {
    let (hour, minute) = time
        .split_once(':')
        .with_context(|| format!("Invalid --daily-at '{time}', expected HH:MM"))?;
    Ok((
        hour.parse()
            .with_context(|| format!("Invalid hour in --daily-at '{time}'"))?,
        minute
            .parse()
            .with_context(|| format!("Invalid minute in --daily-at '{time}'"))?,
    ))
}

/// Pick an LLM provider from whichever API key is present
fn analyst_from_env() -> anyhow::Result<Option<LlmAnalyst>> {
    if env::var("ANTHROPIC_API_KEY").is_ok() {
        let provider = Arc::new(AnthropicProvider::from_env()?);
        let model =
            env::var("PRICEWATCH_MODEL").unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string());
        return Ok(Some(LlmAnalyst::new(provider, model)));
    }

    if env::var("OPENAI_API_KEY").is_ok() {
        let provider = Arc::new(OpenAIProvider::from_env()?);
        let model =
            env::var("PRICEWATCH_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());
        return Ok(Some(LlmAnalyst::new(provider, model)));
    }

    Ok(None)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,pricewatch_agent=info".to_string()),
        )
        .init();

    let cli = Cli::parse();

    let mut builder = WatchConfig::builder()
        .symbol(&cli.symbol)
        .threshold(cli.threshold)
        .schedule(build_schedule(&cli)?)
        .cooldown(Duration::from_secs(cli.cooldown))
        .news_limit(cli.news_limit);
    if !cli.no_log {
        builder = builder.log_path(&cli.log_file);
    }
    let config = builder.build()?;

    let email_config = EmailConfig::from_env().context(
        "email transport is not configured (set EMAIL_API_KEY, EMAIL_SENDER, EMAIL_RECEIVER)",
    )?;
    let notifier = Arc::new(EmailNotifier::new(email_config)?);

    let news_source = match FinnhubClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(_) => None,
    };
    let analyst = analyst_from_env()?;

    println!("======================================================");
    println!("  pricewatch - stock price alert agent");
    println!("  Watching  : {}", config.symbol);
    println!("  Alert if  : price drops below ${:.2}", config.threshold);
    println!("  Schedule  : {}", config.schedule);
    println!("  Email to  : {}", notifier.recipient());
    println!(
        "  Cooldown  : {} min between emails",
        config.cooldown.as_secs() / 60
    );
    match &config.log_path {
        Some(path) => println!("  Log file  : {}", path.display()),
        None => println!("  Log file  : disabled"),
    }
    println!(
        "  News      : {}",
        if news_source.is_some() {
            "Finnhub"
        } else {
            "disabled (set FINNHUB_API_KEY to enable)"
        }
    );
    println!(
        "  Analysis  : {}",
        if analyst.is_some() {
            "enabled"
        } else {
            "disabled (set ANTHROPIC_API_KEY or OPENAI_API_KEY to enable)"
        }
    );
    println!("======================================================");
    println!("  Press Ctrl+C to stop.\n");

    let log_path = config.log_path.clone();

    let mut watcher = PriceWatcher::new(config, Arc::new(YahooFinanceClient::new()), notifier);
    if let Some(news_source) = news_source {
        watcher = watcher.with_news_source(news_source);
    }
    if let Some(analyst) = analyst {
        watcher = watcher.with_analyst(Arc::new(analyst));
    }

    watcher.run().await;

    println!("\nStopped.");
    if let Some(path) = log_path {
        if path.is_file() {
            println!("Price history saved to: {}", path.display());
        }
    }

    Ok(())
}
