use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
];

/// Parse duration strings like "10s", "500ms", "1.5m", "1h"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Invalid duration: {}", s);
            }
            let d = Duration::from_nanos((val * multiplier) as u64);
            if d.is_zero() {
                bail!("Duration must be positive: {}", s);
            }
            return Ok(d);
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format an age for display ("42s", "3m", "2h", "4d")
pub fn format_age(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3_600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3_600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

/// Allowed refresh intervals for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshInterval {
    TenSeconds,
    #[default]
    ThirtySeconds,
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
}

impl RefreshInterval {
    pub const ALL: [RefreshInterval; 5] = [
        RefreshInterval::TenSeconds,
        RefreshInterval::ThirtySeconds,
        RefreshInterval::OneMinute,
        RefreshInterval::FiveMinutes,
        RefreshInterval::FifteenMinutes,
    ];

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(match self {
            RefreshInterval::TenSeconds => 10,
            RefreshInterval::ThirtySeconds => 30,
            RefreshInterval::OneMinute => 60,
            RefreshInterval::FiveMinutes => 300,
            RefreshInterval::FifteenMinutes => 900,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshInterval::TenSeconds => "10s",
            RefreshInterval::ThirtySeconds => "30s",
            RefreshInterval::OneMinute => "1m",
            RefreshInterval::FiveMinutes => "5m",
            RefreshInterval::FifteenMinutes => "15m",
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefreshInterval {
    type Err = anyhow::Error;

    /// Accepts any duration string equal to one of the allowed intervals.
    fn from_str(s: &str) -> Result<Self> {
        let d = parse_duration(s)?;
        match Self::ALL.iter().find(|i| i.as_duration() == d) {
            Some(interval) => Ok(*interval),
            None => bail!(
                "Refresh interval must be one of 10s, 30s, 1m, 5m, 15m (got {})",
                s.trim()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("29.5s").unwrap();
        assert!((d.as_secs_f64() - 29.5).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("988.82775ms").unwrap();
        assert!((d.as_secs_f64() - 0.98882775).abs() < 0.0001);
    }

    #[test]
    fn test_parse_minutes_and_hours() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        // "ms" must not be read as minutes
        assert_eq!(parse_duration("5ms").unwrap(), Duration::from_millis(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("-3s").is_err());
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("0m").is_err());
        assert!(parse_duration("0.0000001ns").is_err());
        assert_eq!(parse_duration("1ns").unwrap(), Duration::from_nanos(1));
    }

    #[test]
    fn test_refresh_interval() {
        assert_eq!("1m".parse::<RefreshInterval>().unwrap(), RefreshInterval::OneMinute);
        assert_eq!("60s".parse::<RefreshInterval>().unwrap(), RefreshInterval::OneMinute);
        assert_eq!(RefreshInterval::default().as_duration(), Duration::from_secs(30));
        assert!("20s".parse::<RefreshInterval>().is_err());
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::from_secs(42)), "42s");
        assert_eq!(format_age(Duration::from_secs(185)), "3m");
        assert_eq!(format_age(Duration::from_secs(7_200)), "2h");
        assert_eq!(format_age(Duration::from_secs(172_800)), "2d");
    }
}
