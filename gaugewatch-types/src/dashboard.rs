//! Dashboard - a point-in-time view of everything a backend returned.

use std::collections::HashMap;

use crate::{AlertThresholdConfig, Monitor, Timestamp};

/// Which resource a fetch failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Resource {
    Monitors,
    AlertRules,
}

impl Resource {
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Monitors => "monitors",
            Resource::AlertRules => "alert rules",
        }
    }
}

/// A failed fetch, recorded alongside the (empty) data it would have produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchError {
    pub resource: Resource,
    pub message: String,
}

/// Normalized monitors and alert configs from a single refresh.
///
/// A failed fetch leaves its list empty and records an entry in `errors`,
/// so an empty `configs` with no [`Resource::AlertRules`] error really does
/// mean "no alerts configured".
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dashboard {
    /// Which upstream schema answered (`legacy`, `formula`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub schema: Option<String>,

    pub fetched_at: Timestamp,

    pub monitors: Vec<Monitor>,

    pub configs: Vec<AlertThresholdConfig>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub errors: Vec<FetchError>,
}

impl Dashboard {
    /// Create an empty dashboard stamped with the current time.
    pub fn new() -> Self {
        Self {
            fetched_at: Timestamp::now(),
            ..Default::default()
        }
    }

    /// Check if the dashboard has no monitors.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Number of monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Look up a monitor by id.
    pub fn monitor(&self, id: &str) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == id)
    }

    /// Index configs by monitor id.
    ///
    /// When several configs target the same monitor the last one wins; only
    /// one config per monitor is ever rendered.
    pub fn config_index(&self) -> HashMap<&str, &AlertThresholdConfig> {
        self.configs
            .iter()
            .map(|c| (c.monitor_id.as_str(), c))
            .collect()
    }

    /// The error recorded for `resource`, if its fetch failed.
    pub fn error_for(&self, resource: Resource) -> Option<&FetchError> {
        self.errors.iter().find(|e| e.resource == resource)
    }

    /// Record a failed fetch.
    pub fn record_error(&mut self, resource: Resource, message: impl Into<String>) {
        self.errors.push(FetchError {
            resource,
            message: message.into(),
        });
    }
}
