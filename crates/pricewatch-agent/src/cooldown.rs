//! Notification cooldown state
//!
//! The gate holds the only piece of mutable state in the agent: the time of
//! the last successfully sent notification. It is advanced exactly once per
//! successful send; a failed send leaves it untouched so the next eligible
//! tick retries naturally.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Minimum-elapsed-time gate between two notifications
#[derive(Debug, Clone)]
pub struct CooldownGate {
    cooldown: chrono::Duration,
    last_alert: Option<DateTime<Utc>>,
}

impl CooldownGate {
    /// Create a gate that keeps `cooldown` between notifications
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: chrono::Duration::from_std(cooldown).unwrap_or(chrono::Duration::MAX),
            last_alert: None,
        }
    }

    /// Whether a notification may be sent at `now`
    ///
    /// True when no notification was ever sent, or when strictly more than
    /// the cooldown has elapsed since the last one.
    pub fn ready(&self, now: DateTime<Utc>) -> bool {
        match self.last_alert {
            None => true,
            Some(last) => now.signed_duration_since(last) > self.cooldown,
        }
    }

    /// Time left until the gate opens again, `None` when it is open
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_alert?;
        let left = self.cooldown - now.signed_duration_since(last);
        if left > chrono::Duration::zero() {
            Some(left.to_std().unwrap_or(Duration::ZERO))
        } else {
            None
        }
    }

    /// Record a successful send at `now`
    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.last_alert = Some(now);
    }

    /// Time of the last successful send, if any
    pub fn last_alert(&self) -> Option<DateTime<Utc>> {
        self.last_alert
    }
}
