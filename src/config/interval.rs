//! Polling interval values as they appear in the config file.

use std::time::Duration;

use serde::Deserialize;

/// A polling period written either as a bare number of minutes or as a
/// suffixed string such as `"30s"`, `"5m"`, `"1h"` or `"1d"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Interval {
    Minutes(u64),
    Text(String),
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Minutes(DEFAULT_PERIOD_MINUTES)
    }
}

pub const DEFAULT_PERIOD_MINUTES: u64 = 5;

impl Interval {
    pub fn to_duration(&self) -> Result<Duration, String> {
        let secs = match self {
            Interval::Minutes(m) => m
                .checked_mul(60)
                .ok_or_else(|| format!("Interval too large: {} minutes", m))?,
            Interval::Text(s) => parse_interval(s)?,
        };

        if secs == 0 {
            return Err("Interval must be greater than zero".to_string());
        }

        Ok(Duration::from_secs(secs))
    }
}

/// Parse interval string like "1h", "30m", "6h", "1d" into seconds.
/// A bare number is read as minutes, matching the numeric config form.
pub fn parse_interval(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    let (digits, unit) = if let Some(hours) = s.strip_suffix('h') {
        (hours, 3600)
    } else if let Some(minutes) = s.strip_suffix('m') {
        (minutes, 60)
    } else if let Some(days) = s.strip_suffix('d') {
        (days, 86400)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1)
    } else {
        (s.as_str(), 60)
    };

    digits
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(unit))
        .ok_or_else(|| format!("Invalid interval: {}. Use format like '30s', '5m', '1h'", s))
}

/// Format interval for display
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 86400 && secs % 86400 == 0 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("1h").unwrap(), 3600);
        assert_eq!(parse_interval("30m").unwrap(), 1800);
        assert_eq!(parse_interval("1d").unwrap(), 86400);
        assert_eq!(parse_interval("45s").unwrap(), 45);
        assert_eq!(parse_interval("10").unwrap(), 600);
        assert_eq!(parse_interval(" 2H ").unwrap(), 7200);
        tokio_test::assert_err!(parse_interval("invalid"));
        tokio_test::assert_err!(parse_interval("m"));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(3600)), "1h");
        assert_eq!(format_interval(Duration::from_secs(1800)), "30m");
        assert_eq!(format_interval(Duration::from_secs(86400)), "1d");
        assert_eq!(format_interval(Duration::from_secs(90)), "90s");
    }

    #[test]
    fn test_minutes_to_duration() {
        assert_eq!(
            Interval::Minutes(5).to_duration().unwrap(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_zero_rejected() {
        assert!(Interval::Minutes(0).to_duration().is_err());
        assert!(Interval::Text("0s".into()).to_duration().is_err());
    }
}
