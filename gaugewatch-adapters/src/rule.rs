//! Upstream alert rules and their expansion into per-monitor configs.

use gaugewatch_types::{AlertThresholdConfig, Monitor, Severity, Timestamp};
use tracing::debug;

use crate::condition::Condition;

/// An alert rule as reported by a backend, before expansion.
///
/// Both schemas normalize to this shape: legacy alerts carry structured
/// thresholds and always target a monitor, formula rules are parsed from
/// their condition text and may be global.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRule {
    pub id: String,
    pub enabled: bool,
    pub severity: Option<Severity>,
    /// `None` means the rule applies to every monitor.
    pub monitor_id: Option<String>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub updated_at: Timestamp,
}

impl AlertRule {
    /// Build a rule from condition text.
    ///
    /// Returns `None` for conditions that do not parse; such rules are
    /// dropped rather than reported.
    pub fn from_condition(
        id: impl Into<String>,
        condition: &str,
        enabled: bool,
        severity: Option<Severity>,
        updated_at: Timestamp,
    ) -> Option<Self> {
        let id = id.into();
        match Condition::parse(condition) {
            Ok(parsed) => Some(Self {
                id,
                enabled,
                severity,
                monitor_id: parsed.monitor_id,
                upper: parsed.upper,
                lower: parsed.lower,
                updated_at,
            }),
            Err(e) => {
                debug!(rule = %id, error = %e, "Dropping alert rule with unparseable condition");
                None
            }
        }
    }

    /// True if at least one bound is present.
    pub fn has_threshold(&self) -> bool {
        self.upper.is_some() || self.lower.is_some()
    }

    /// Expand this rule into configs for the monitors it applies to.
    ///
    /// - disabled rules and rules without thresholds produce nothing
    /// - a targeted rule produces one config, if its monitor exists
    /// - a global rule produces one config per monitor
    pub fn expand(&self, monitors: &[Monitor]) -> Vec<AlertThresholdConfig> {
        if !self.enabled || !self.has_threshold() {
            return Vec::new();
        }

        match &self.monitor_id {
            Some(target) => {
                if monitors.iter().any(|m| &m.id == target) {
                    vec![self.config_for(target)]
                } else {
                    debug!(rule = %self.id, monitor = %target, "Alert rule targets unknown monitor");
                    Vec::new()
                }
            }
            None => monitors.iter().map(|m| self.config_for(&m.id)).collect(),
        }
    }

    fn config_for(&self, monitor_id: &str) -> AlertThresholdConfig {
        AlertThresholdConfig {
            monitor_id: monitor_id.to_string(),
            rule_id: Some(self.id.clone()),
            upper_threshold: self.upper,
            lower_threshold: self.lower,
            severity: self.severity,
            updated_at: self.updated_at,
        }
    }
}

/// Expand every rule against the current monitor list.
///
/// Configs from one rule stay adjacent; no other ordering is promised.
pub fn expand_rules(rules: &[AlertRule], monitors: &[Monitor]) -> Vec<AlertThresholdConfig> {
    rules.iter().flat_map(|rule| rule.expand(monitors)).collect()
}
