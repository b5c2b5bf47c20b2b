//! Alert threshold configuration.

use std::fmt;
use std::str::FromStr;

use crate::Timestamp;

/// Rank given to configs whose severity the backend reported in a form we
/// do not recognise. Sorts after every known severity.
pub const UNKNOWN_SEVERITY_RANK: u8 = 4;

/// Alert severity.
///
/// The derived ordering follows the sort rank: `Critical < High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank: `critical` = 0 through `low` = 3.
    pub const fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    /// Short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Critical => "CRIT",
            Severity::High => "HIGH",
            Severity::Medium => "MED",
            Severity::Low => "LOW",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Rank for an optional severity; unknown severities rank last.
pub fn severity_rank(severity: Option<Severity>) -> u8 {
    severity.map_or(UNKNOWN_SEVERITY_RANK, |s| s.rank())
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "crit" | "p1" => Ok(Self::Critical),
            "high" | "p2" => Ok(Self::High),
            "medium" | "med" | "p3" => Ok(Self::Medium),
            "low" | "p4" => Ok(Self::Low),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold configuration for a single monitor.
///
/// One upstream rule may expand into several of these (one per monitor it
/// applies to).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertThresholdConfig {
    pub monitor_id: String,

    /// Upstream rule this config was expanded from.
    pub rule_id: Option<String>,

    pub upper_threshold: Option<f64>,

    pub lower_threshold: Option<f64>,

    /// `None` when the backend reported a severity we do not recognise.
    pub severity: Option<Severity>,

    pub updated_at: Timestamp,
}

impl AlertThresholdConfig {
    /// Create a builder for a config targeting `monitor_id`.
    pub fn builder(monitor_id: impl Into<String>) -> AlertThresholdConfigBuilder {
        AlertThresholdConfigBuilder::new(monitor_id)
    }

    /// A config counts as configured when at least one threshold is present.
    ///
    /// A threshold of `0.0` is present.
    pub fn is_configured(&self) -> bool {
        self.upper_threshold.is_some() || self.lower_threshold.is_some()
    }

    /// Sort rank of this config's severity.
    pub fn severity_rank(&self) -> u8 {
        severity_rank(self.severity)
    }

    /// Human-readable bounds, e.g. `< 5 | > 100`.
    pub fn describe_bounds(&self) -> String {
        let lower = self.lower_threshold.map(|l| format!("< {}", crate::format_number(l)));
        let upper = self.upper_threshold.map(|u| format!("> {}", crate::format_number(u)));
        match (lower, upper) {
            (Some(l), Some(u)) => format!("{l} | {u}"),
            (Some(l), None) => l,
            (None, Some(u)) => u,
            (None, None) => "-".to_string(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `AlertThresholdConfig`.
#[derive(Debug)]
pub struct AlertThresholdConfigBuilder {
    config: AlertThresholdConfig,
}

impl AlertThresholdConfigBuilder {
    /// Create a new builder.
    pub fn new(monitor_id: impl Into<String>) -> Self {
        Self {
            config: AlertThresholdConfig {
                monitor_id: monitor_id.into(),
                rule_id: None,
                upper_threshold: None,
                lower_threshold: None,
                severity: Some(Severity::Medium),
                updated_at: Timestamp::default(),
            },
        }
    }

    pub fn rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.config.rule_id = Some(rule_id.into());
        self
    }

    pub fn upper(mut self, upper: f64) -> Self {
        self.config.upper_threshold = Some(upper);
        self
    }

    pub fn lower(mut self, lower: f64) -> Self {
        self.config.lower_threshold = Some(lower);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.config.severity = Some(severity);
        self
    }

    pub fn unknown_severity(mut self) -> Self {
        self.config.severity = None;
        self
    }

    pub fn updated_at(mut self, at: impl Into<Timestamp>) -> Self {
        self.config.updated_at = at.into();
        self
    }

    /// Build the config.
    pub fn build(self) -> AlertThresholdConfig {
        self.config
    }
}
