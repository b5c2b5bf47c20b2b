//! Monitors: named, unit-tagged numeric data sources.

use crate::Timestamp;

/// Whether a monitor's value is computed by the backend or set by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MonitorKind {
    /// Value computed by the backend (a query or formula).
    #[default]
    Regular,
    /// Value set manually (a "constant card").
    Constant,
}

impl MonitorKind {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorKind::Regular => "regular",
            MonitorKind::Constant => "constant",
        }
    }
}

/// Aggregate statistics for a monitor.
///
/// Not every backend schema reports these; a backend that does not will
/// leave every field `None`. The struct itself is always present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
}

impl Statistics {
    /// Statistics for a backend that cannot report any.
    pub const fn unavailable() -> Self {
        Self {
            min: None,
            max: None,
            average: None,
        }
    }

    /// True if at least one statistic is known.
    pub fn is_available(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.average.is_some()
    }
}

/// A monitored numeric data source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monitor {
    /// Stable identifier, unique across the backend.
    pub id: String,

    /// Human-readable name. Falls back to `id` when absent (see [`Monitor::name`]).
    pub display_name: Option<String>,

    pub kind: MonitorKind,

    pub unit: Option<String>,

    /// Latest value; `None` means the backend has no data yet.
    pub current_value: Option<f64>,

    pub last_updated: Timestamp,

    pub statistics: Statistics,

    /// Deep link into the backend's own UI.
    pub source_url: Option<String>,

    /// Formula the value is computed from (formula schema only).
    pub formula: Option<String>,
}

impl Monitor {
    /// Create a monitor with only an id; every optional field is unavailable.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            kind: MonitorKind::Regular,
            unit: None,
            current_value: None,
            last_updated: Timestamp::default(),
            statistics: Statistics::unavailable(),
            source_url: None,
            formula: None,
        }
    }

    /// Create a builder for a monitor.
    pub fn builder(id: impl Into<String>) -> MonitorBuilder {
        MonitorBuilder::new(id)
    }

    /// Display name, falling back to the id.
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }

    /// Value with its unit, or `-` when there is no data.
    pub fn formatted_value(&self) -> String {
        match (self.current_value, self.unit.as_deref()) {
            (Some(v), Some(unit)) if !unit.is_empty() => format!("{} {}", format_number(v), unit),
            (Some(v), _) => format_number(v),
            (None, _) => "-".to_string(),
        }
    }
}

/// Format a value without trailing zeros (`100`, `2.5`, `0.125`).
///
/// Magnitudes below 0.001 keep three significant digits (`4e-4`) so a
/// nonzero value never prints as `0`.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        // Also covers -0.0
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    if v.abs() < 0.001 {
        let s = format!("{:.2e}", v);
        return match s.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => s,
        };
    }
    trim_zeros(&format!("{:.3}", v)).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// One point of a monitor's value history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryPoint {
    pub at: Timestamp,
    pub value: f64,
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `Monitor`.
#[derive(Debug)]
pub struct MonitorBuilder {
    monitor: Monitor,
}

impl MonitorBuilder {
    /// Create a new builder.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            monitor: Monitor::new(id),
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.monitor.display_name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: MonitorKind) -> Self {
        self.monitor.kind = kind;
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.monitor.unit = Some(unit.into());
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.monitor.current_value = Some(value);
        self
    }

    pub fn last_updated(mut self, at: impl Into<Timestamp>) -> Self {
        self.monitor.last_updated = at.into();
        self
    }

    pub fn statistics(mut self, statistics: Statistics) -> Self {
        self.monitor.statistics = statistics;
        self
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.monitor.source_url = Some(url.into());
        self
    }

    pub fn formula(mut self, formula: impl Into<String>) -> Self {
        self.monitor.formula = Some(formula.into());
        self
    }

    /// Build the monitor.
    pub fn build(self) -> Monitor {
        self.monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_falls_back_to_id() {
        let unnamed = Monitor::new("m1");
        assert_eq!(unnamed.name(), "m1");

        let blank = Monitor::builder("m2").display_name("").build();
        assert_eq!(blank.name(), "m2");

        let named = Monitor::builder("m3").display_name("Queue depth").build();
        assert_eq!(named.name(), "Queue depth");
    }

    #[test]
    fn test_new_monitor_has_unavailable_fields() {
        let m = Monitor::new("m1");
        assert_eq!(m.current_value, None);
        assert!(!m.statistics.is_available());
        assert_eq!(m.kind, MonitorKind::Regular);
    }

    #[test]
    fn test_formatted_value() {
        let m = Monitor::builder("m").value(12.5).unit("ms").build();
        assert_eq!(m.formatted_value(), "12.5 ms");

        let m = Monitor::builder("m").value(100.0).build();
        assert_eq!(m.formatted_value(), "100");

        assert_eq!(Monitor::new("m").formatted_value(), "-");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.125), "0.125");
        assert_eq!(format_number(2.10), "2.1");
    }

    #[test]
    fn test_format_number_small_and_negative_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.0004), "4e-4");
        assert_eq!(format_number(-0.0004), "-4e-4");
        assert_eq!(format_number(0.000123456), "1.23e-4");
        assert_eq!(format_number(0.001), "0.001");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_keeps_unavailable_fields() {
        let json = serde_json::to_value(Monitor::new("m1")).unwrap();
        assert!(json.get("current_value").unwrap().is_null());
        assert!(json["statistics"].get("min").unwrap().is_null());
        assert_eq!(json["kind"], "regular");
    }
}
