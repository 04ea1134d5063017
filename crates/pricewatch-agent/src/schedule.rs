//! Tick scheduling
//!
//! Two trigger styles: a fixed interval between ticks, or once per day at a
//! wall-clock time in a configured timezone. The daily variant computes the
//! next trigger with calendar date arithmetic, so month and year rollovers
//! need no special handling, and resolves DST gaps and ambiguities through
//! [`LocalResult`].

use chrono::{DateTime, Days, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::time::Duration;

use crate::error::{Result, WatchError};

/// When the alert loop ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Tick immediately, then every fixed interval
    Every(Duration),

    /// Tick once per day at the given local wall-clock time
    DailyAt {
        hour: u32,
        minute: u32,
        timezone: Tz,
    },
}

impl Schedule {
    /// Fixed-interval schedule
    pub fn every(interval: Duration) -> Self {
        Self::Every(interval)
    }

    /// Daily schedule at `hour:minute` in `timezone`
    pub fn daily_at(hour: u32, minute: u32, timezone: Tz) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(WatchError::ConfigError(format!(
                "Invalid daily trigger time {hour:02}:{minute:02}"
            )));
        }
        Ok(Self::DailyAt {
            hour,
            minute,
            timezone,
        })
    }

    /// Delay before the very first tick
    ///
    /// Interval schedules check immediately on startup; daily schedules wait
    /// for the next trigger time.
    pub fn initial_delay(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::Every(_) => Duration::ZERO,
            Self::DailyAt { .. } => self.until_next(now),
        }
    }

    /// Delay between the tick that just ran and the next one
    pub fn next_delay(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::Every(interval) => *interval,
            Self::DailyAt { .. } => self.until_next(now),
        }
    }

    fn until_next(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::Every(interval) => *interval,
            Self::DailyAt {
                hour,
                minute,
                timezone,
            } => {
                let next = next_daily_occurrence(now, *hour, *minute, *timezone);
                (next - now).to_std().unwrap_or(Duration::ZERO)
            }
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Every(interval) => write!(f, "every {}s", interval.as_secs()),
            Self::DailyAt {
                hour,
                minute,
                timezone,
            } => write!(f, "daily at {hour:02}:{minute:02} ({timezone})"),
        }
    }
}

/// Next occurrence of `hour:minute` in `timezone`, strictly after `now`
pub fn next_daily_occurrence(now: DateTime<Utc>, hour: u32, minute: u32, tz: Tz) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();
    loop {
        if let Some(candidate) = resolve_local(date, hour, minute, tz) {
            if candidate > now {
                return candidate;
            }
        }
        // Already past today's trigger, or the local time does not exist
        // (DST gap): try the next calendar day.
        date = date + Days::new(1);
    }
}

fn resolve_local(date: NaiveDate, hour: u32, minute: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        // Clocks fell back: the local time happens twice, take the earlier.
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        // Clocks sprang forward: the local time never happens.
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_interval_delays() {
        let schedule = Schedule::every(Duration::from_secs(60));
        let now = Utc::now();
        assert_eq!(schedule.initial_delay(now), Duration::ZERO);
        assert_eq!(schedule.next_delay(now), Duration::from_secs(60));
    }

    #[test]
    fn test_daily_rejects_invalid_time() {
        assert!(Schedule::daily_at(24, 0, chrono_tz::UTC).is_err());
        assert!(Schedule::daily_at(9, 60, chrono_tz::UTC).is_err());
        assert!(Schedule::daily_at(23, 59, chrono_tz::UTC).is_ok());
    }

    #[test]
    fn test_daily_same_day_when_trigger_ahead() {
        let now = utc(2026, 6, 15, 8, 0, 0);
        let next = next_daily_occurrence(now, 9, 30, chrono_tz::UTC);
        assert_eq!(next, utc(2026, 6, 15, 9, 30, 0));
    }

    #[test]
    fn test_daily_next_day_when_trigger_passed() {
        let now = utc(2026, 6, 15, 10, 0, 0);
        let next = next_daily_occurrence(now, 9, 30, chrono_tz::UTC);
        assert_eq!(next, utc(2026, 6, 16, 9, 30, 0));
    }

    #[test]
    fn test_daily_month_rollover() {
        let now = utc(2026, 1, 31, 12, 0, 0);
        let next = next_daily_occurrence(now, 9, 0, chrono_tz::UTC);
        assert_eq!(next, utc(2026, 2, 1, 9, 0, 0));
    }

    #[test]
    fn test_daily_year_rollover() {
        let now = utc(2026, 12, 31, 23, 30, 0);
        let next = next_daily_occurrence(now, 9, 0, chrono_tz::UTC);
        assert_eq!(next, utc(2027, 1, 1, 9, 0, 0));
    }

    #[test]
    fn test_daily_skips_dst_gap() {
        // US clocks spring forward on 2026-03-08; 02:30 local never happens
        // that day in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        let now = utc(2026, 3, 8, 5, 0, 0);
        let next = next_daily_occurrence(now, 2, 30, tz);
        // 2026-03-09 02:30 EDT == 06:30 UTC
        assert_eq!(next, utc(2026, 3, 9, 6, 30, 0));
    }

    #[test]
    fn test_daily_takes_earliest_on_dst_ambiguity() {
        // US clocks fall back on 2026-11-01; 01:30 local happens twice in
        // New York. The earlier instant is still EDT (UTC-4).
        let tz: Tz = "America/New_York".parse().unwrap();
        let now = utc(2026, 11, 1, 1, 0, 0);
        let next = next_daily_occurrence(now, 1, 30, tz);
        assert_eq!(next, utc(2026, 11, 1, 5, 30, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Schedule::every(Duration::from_secs(60)).to_string(),
            "every 60s"
        );
        let daily = Schedule::daily_at(9, 30, chrono_tz::UTC).unwrap();
        assert_eq!(daily.to_string(), "daily at 09:30 (UTC)");
    }
}
