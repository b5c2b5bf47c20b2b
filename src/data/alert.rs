//! Alert evaluation and the per-row view model.
//!
//! A [`MonitorRow`] joins a monitor with the threshold config that applies to
//! it, the user's local annotations, and the derived breach flag. Rows are
//! rebuilt from the last fetched [`Dashboard`] whenever data or annotations
//! change.

use std::time::Instant;

use gaugewatch_types::{AlertThresholdConfig, Dashboard, FetchError, Monitor, Resource, Timestamp};

use crate::annotations::Annotations;

/// Whether `value` lies outside the configured bounds.
///
/// Both comparisons are strict, and a bound counts whenever it is present,
/// including a bound of `0`. A missing value never breaches.
pub fn is_breached(value: Option<f64>, upper: Option<f64>, lower: Option<f64>) -> bool {
    let Some(value) = value else {
        return false;
    };
    if let Some(upper) = upper {
        if value > upper {
            return true;
        }
    }
    if let Some(lower) = lower {
        if value < lower {
            return true;
        }
    }
    false
}

/// One displayable row: a monitor, its optional config, and derived state.
#[derive(Debug, Clone)]
pub struct MonitorRow {
    pub monitor: Monitor,
    pub config: Option<AlertThresholdConfig>,
    pub alias: Option<String>,
    pub tags: Vec<String>,
    /// A config applies to this monitor.
    pub active: bool,
    /// The current value is outside the config's bounds.
    pub breached: bool,
}

impl MonitorRow {
    pub fn new(monitor: Monitor, config: Option<AlertThresholdConfig>) -> Self {
        let breached = config.as_ref().is_some_and(|c| {
            is_breached(monitor.current_value, c.upper_threshold, c.lower_threshold)
        });
        Self {
            active: config.is_some(),
            breached,
            monitor,
            config,
            alias: None,
            tags: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.monitor.id
    }

    /// Display name from the backend (falls back to the id).
    pub fn name(&self) -> &str {
        self.monitor.name()
    }

    /// Label shown in tables: the alias when one is set.
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.monitor.name())
    }

    /// Severity rank of the config, `UNKNOWN_SEVERITY_RANK` without one.
    pub fn severity_rank(&self) -> u8 {
        self.config
            .as_ref()
            .map_or(gaugewatch_types::UNKNOWN_SEVERITY_RANK, |c| c.severity_rank())
    }

    /// Case-insensitive match against name, id, alias and tags.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.name().to_lowercase().contains(&needle)
            || self.monitor.id.to_lowercase().contains(&needle)
            || self.alias.as_deref().is_some_and(|a| a.to_lowercase().contains(&needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    fn annotate(mut self, annotations: &Annotations) -> Self {
        self.alias = annotations.alias(&self.monitor.id).map(str::to_string);
        self.tags = annotations.tags(&self.monitor.id).to_vec();
        self
    }
}

/// Everything the views render, derived from one fetched dashboard.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// One row per monitor, in fetch order, using the last config per monitor.
    pub monitors: Vec<MonitorRow>,
    /// One row per config whose monitor exists, in emission order.
    pub alerts: Vec<MonitorRow>,
    pub schema: Option<String>,
    pub fetched_at: Timestamp,
    pub errors: Vec<FetchError>,
    /// When this data was received locally.
    pub last_updated: Instant,
}

impl DashboardData {
    pub fn from_dashboard(dashboard: &Dashboard, annotations: &Annotations) -> Self {
        let index = dashboard.config_index();

        let monitors = dashboard
            .monitors
            .iter()
            .map(|m| {
                let config = index.get(m.id.as_str()).map(|c| (*c).clone());
                MonitorRow::new(m.clone(), config).annotate(annotations)
            })
            .collect();

        let alerts = dashboard
            .configs
            .iter()
            .filter_map(|c| {
                let monitor = dashboard.monitor(&c.monitor_id)?;
                Some(MonitorRow::new(monitor.clone(), Some(c.clone())).annotate(annotations))
            })
            .collect();

        Self {
            monitors,
            alerts,
            schema: dashboard.schema.clone(),
            fetched_at: dashboard.fetched_at,
            errors: dashboard.errors.clone(),
            last_updated: Instant::now(),
        }
    }

    pub fn breached_count(&self) -> usize {
        self.monitors.iter().filter(|r| r.breached).count()
    }

    pub fn active_count(&self) -> usize {
        self.monitors.iter().filter(|r| r.active).count()
    }

    pub fn row(&self, id: &str) -> Option<&MonitorRow> {
        self.monitors.iter().find(|r| r.monitor.id == id)
    }
}

/// Keep the previous data for any resource whose latest fetch failed.
///
/// Monitors and their configs travel together: if the monitor fetch failed,
/// the new configs were expanded against an empty list and are useless.
pub fn retain_stale(previous: &Dashboard, next: &mut Dashboard) {
    let monitors_failed = next.error_for(Resource::Monitors).is_some();
    let rules_failed = next.error_for(Resource::AlertRules).is_some();

    if monitors_failed {
        next.monitors = previous.monitors.clone();
        next.configs = previous.configs.clone();
    } else if rules_failed {
        next.configs = previous.configs.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaugewatch_types::Severity;

    #[test]
    fn test_strict_upper() {
        assert!(is_breached(Some(101.0), Some(100.0), None));
        assert!(!is_breached(Some(100.0), Some(100.0), None));
        assert!(!is_breached(Some(99.0), Some(100.0), None));
    }

    #[test]
    fn test_zero_lower_bound_counts() {
        assert!(is_breached(Some(-1.0), None, Some(0.0)));
        assert!(!is_breached(Some(0.0), None, Some(0.0)));
    }

    #[test]
    fn test_zero_upper_bound_counts() {
        assert!(is_breached(Some(0.5), Some(0.0), None));
    }

    #[test]
    fn test_missing_value_never_breaches() {
        assert!(!is_breached(None, Some(0.0), Some(0.0)));
        assert!(!is_breached(None, Some(-10.0), None));
    }

    #[test]
    fn test_no_bounds_never_breaches() {
        assert!(!is_breached(Some(1e9), None, None));
    }

    #[test]
    fn test_row_breach_from_config() {
        let monitor = Monitor::builder("m1").value(150.0).build();
        let config = AlertThresholdConfig::builder("m1").upper(100.0).build();
        let row = MonitorRow::new(monitor, Some(config));
        assert!(row.active);
        assert!(row.breached);

        let row = MonitorRow::new(Monitor::builder("m2").value(150.0).build(), None);
        assert!(!row.active);
        assert!(!row.breached);
    }

    #[test]
    fn test_row_filter_matches_alias_and_tags() {
        let mut row = MonitorRow::new(Monitor::builder("cpu-1").display_name("CPU").build(), None);
        row.alias = Some("Web box".to_string());
        row.tags = vec!["prod".to_string()];

        assert!(row.matches("cpu"));
        assert!(row.matches("WEB"));
        assert!(row.matches("pro"));
        assert!(!row.matches("staging"));
        assert_eq!(row.label(), "Web box");
    }

    #[test]
    fn test_dashboard_data_uses_last_config_and_lists_all_alerts() {
        let mut dashboard = Dashboard::new();
        dashboard.monitors = vec![
            Monitor::builder("m1").value(50.0).build(),
            Monitor::builder("m2").value(5.0).build(),
        ];
        dashboard.configs = vec![
            AlertThresholdConfig::builder("m1").upper(10.0).severity(Severity::Low).build(),
            AlertThresholdConfig::builder("m1").upper(100.0).severity(Severity::High).build(),
            AlertThresholdConfig::builder("gone").upper(1.0).build(),
        ];

        let data = DashboardData::from_dashboard(&dashboard, &Annotations::default());

        assert_eq!(data.monitors.len(), 2);
        let m1 = data.row("m1").unwrap();
        assert_eq!(m1.config.as_ref().unwrap().severity, Some(Severity::High));
        assert!(!m1.breached);

        assert_eq!(data.alerts.len(), 2);
        assert!(data.alerts[0].breached);
        assert_eq!(data.breached_count(), 0);
        assert_eq!(data.active_count(), 1);
    }

    #[test]
    fn test_retain_stale_on_monitor_failure() {
        let mut previous = Dashboard::new();
        previous.monitors = vec![Monitor::new("m1")];
        previous.configs = vec![AlertThresholdConfig::builder("m1").upper(1.0).build()];

        let mut next = Dashboard::new();
        next.record_error(Resource::Monitors, "timed out");
        retain_stale(&previous, &mut next);

        assert_eq!(next.monitors.len(), 1);
        assert_eq!(next.configs.len(), 1);
        assert!(next.error_for(Resource::Monitors).is_some());
    }

    #[test]
    fn test_retain_stale_keeps_fresh_monitors_on_rule_failure() {
        let mut previous = Dashboard::new();
        previous.monitors = vec![Monitor::new("old")];
        previous.configs = vec![AlertThresholdConfig::builder("old").upper(1.0).build()];

        let mut next = Dashboard::new();
        next.monitors = vec![Monitor::new("new")];
        next.record_error(Resource::AlertRules, "500");
        retain_stale(&previous, &mut next);

        assert_eq!(next.monitors[0].id, "new");
        assert_eq!(next.configs.len(), 1);
    }
}
