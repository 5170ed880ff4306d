use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of "now", swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[cfg(test)]
struct FixedClock(DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
pub fn fixed_clock(timestamp: i64) -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        DateTime::from_timestamp(timestamp, 0).unwrap_or_default(),
    ))
}

/// "5m ago" style age of `then` relative to `now`.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86400 => format!("{}h ago", secs / 3600),
        86400..2_592_000 => format!("{}d ago", secs / 86400),
        2_592_000..31_536_000 => format!("{}mo ago", secs / 2_592_000),
        _ => format!("{}y ago", secs / 31_536_000),
    }
}

/// Render a server date (RFC 3339) relative to `now`; unparseable dates are
/// shown as they came.
pub fn format_server_date(date: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(then) => format_relative(then.with_timezone(&Utc), now),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn test_format_relative_buckets() {
        let now = at(1_700_000_000);
        assert_eq!(format_relative(at(1_700_000_000 - 10), now), "just now");
        assert_eq!(format_relative(at(1_700_000_000 - 300), now), "5m ago");
        assert_eq!(format_relative(at(1_700_000_000 - 7200), now), "2h ago");
        assert_eq!(format_relative(at(1_700_000_000 - 86400 * 3), now), "3d ago");
    }

    #[test]
    fn test_future_dates_are_just_now() {
        let now = at(1_700_000_000);
        assert_eq!(format_relative(at(1_700_000_100), now), "just now");
    }

    #[test]
    fn test_format_server_date() {
        let now = at(1_700_000_000); // 2023-11-14T22:13:20Z
        assert_eq!(format_server_date("2023-11-14T21:13:20Z", now), "1h ago");
        assert_eq!(format_server_date("yesterday", now), "yesterday");
    }
}
