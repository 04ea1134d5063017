//! Email delivery over an HTTP email-sending API
//!
//! Speaks the Resend wire format (`POST {api_base}/emails` with a bearer
//! token), which several transactional email providers accept.

use super::{AlertMessage, Notifier};
use crate::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_EMAIL_API_BASE: &str = "https://api.resend.com";
const SEND_TIMEOUT_SECS: u64 = 30;

/// Email transport configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Base URL of the email API
    pub api_base: String,

    /// API key for the email service
    pub api_key: String,

    /// Sender address
    pub sender: String,

    /// Recipient address
    pub recipient: String,
}

impl EmailConfig {
    /// Create config from environment variables
    ///
    /// Requires `EMAIL_API_KEY`, `EMAIL_SENDER` and `EMAIL_RECEIVER`;
    /// `EMAIL_API_BASE` overrides the default endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("EMAIL_API_KEY")
            .map_err(|_| WatchError::ConfigError("EMAIL_API_KEY not set".to_string()))?;
        let sender = std::env::var("EMAIL_SENDER")
            .map_err(|_| WatchError::ConfigError("EMAIL_SENDER not set".to_string()))?;
        let recipient = std::env::var("EMAIL_RECEIVER")
            .map_err(|_| WatchError::ConfigError("EMAIL_RECEIVER not set".to_string()))?;

        let api_base = std::env::var("EMAIL_API_BASE")
            .unwrap_or_else(|_| DEFAULT_EMAIL_API_BASE.to_string());

        Ok(Self {
            api_base,
            api_key,
            sender,
            recipient,
        })
    }
}

/// Notifier delivering alerts by email
pub struct EmailNotifier {
    client: Client,
    config: EmailConfig,
}

impl EmailNotifier {
    /// Create a new email notifier
    pub fn new(config: EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, config })
    }

    /// Recipient address alerts go to
    pub fn recipient(&self) -> &str {
        &self.config.recipient
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    #[instrument(skip(self, message), fields(recipient = %self.config.recipient))]
    async fn send(&self, message: &AlertMessage) -> Result<()> {
        debug!("Sending alert email");

        let request = SendEmailRequest {
            from: &self.config.sender,
            to: std::slice::from_ref(&self.config.recipient),
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| WatchError::Notification(format!("Email request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(WatchError::AuthenticationFailed {
                    service: "email".to_string(),
                });
            }
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::Notification(format!(
                "Email API error {status}: {body}"
            )));
        }

        debug!("Alert email accepted by API");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            api_base: "https://api.example.com".to_string(),
            api_key: "key".to_string(),
            sender: "alerts@example.com".to_string(),
            recipient: "you@example.com".to_string(),
        }
    }

    #[test]
    fn test_notifier_creation() {
        let notifier = EmailNotifier::new(config()).unwrap();
        assert_eq!(notifier.recipient(), "you@example.com");
    }

    #[test]
    fn test_request_serialization() {
        let to = vec!["you@example.com".to_string()];
        let request = SendEmailRequest {
            from: "alerts@example.com",
            to: &to,
            subject: "subject",
            text: "body",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["from"], "alerts@example.com");
        assert_eq!(json["to"][0], "you@example.com");
        assert_eq!(json["subject"], "subject");
        assert_eq!(json["text"], "body");
    }
}
