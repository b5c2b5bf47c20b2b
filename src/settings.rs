//! Configuration loading.
//!
//! Settings come from an optional TOML file and `GAUGEWATCH_*` environment
//! variables, in that order; command-line flags are applied on top by the
//! binary.
//!
//! ```toml
//! [backend]
//! url = "https://metrics.example.com"
//! username = "admin"
//! password = "secret"
//! schema = "auto"          # legacy | formula | auto
//! timeout = "10s"
//!
//! [view]
//! pinned = "cpu, error-rate"
//! custom_order = "error-rate, cpu, queue-depth"
//! display_mode = "name_value"   # value | name_value | alert_count
//! refresh_interval = "30s"      # 10s | 30s | 1m | 5m | 15m
//! sort = "name"
//!
//! [storage]
//! dir = ".gaugewatch"
//! ```
//!
//! Nested keys map to environment variables with a double underscore, e.g.
//! `GAUGEWATCH_BACKEND__URL` or `GAUGEWATCH_VIEW__CUSTOM_ORDER`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use gaugewatch_adapters::{Credentials, SchemaKind};

use crate::data::duration::parse_duration;
use crate::data::{RefreshInterval, SortStrategy};

/// What the header ticker shows for each pinned monitor.
///
/// Settings files, the environment and [`FromStr`] accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DisplayMode {
    /// Just the value.
    Value,
    /// Name (or alias) and value.
    #[default]
    NameValue,
    /// Number of breached monitors.
    AlertCount,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Value => "value",
            DisplayMode::NameValue => "name_value",
            DisplayMode::AlertCount => "alert_count",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "value" => Ok(Self::Value),
            "name_value" | "namevalue" => Ok(Self::NameValue),
            "alert_count" | "alertcount" => Ok(Self::AlertCount),
            other => Err(format!("unknown display mode: {other}")),
        }
    }
}

impl TryFrom<String> for DisplayMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub schema: SchemaKind,
    pub timeout: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            username: String::new(),
            password: String::new(),
            schema: SchemaKind::Auto,
            timeout: "10s".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Comma-separated monitor ids shown first and rotated in the header.
    pub pinned: String,
    /// Comma-separated monitor ids for the custom sort.
    pub custom_order: String,
    pub display_mode: DisplayMode,
    pub refresh_interval: String,
    pub sort: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            pinned: String::new(),
            custom_order: String::new(),
            display_mode: DisplayMode::default(),
            refresh_interval: RefreshInterval::default().as_str().to_string(),
            sort: SortStrategy::default().as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".gaugewatch"),
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub schema: Option<SchemaKind>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub refresh_interval: Option<String>,
    pub sort: Option<String>,
}

/// All settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub view: ViewSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from an optional file, the environment and command-line
    /// overrides, in increasing precedence, then validate the merged result.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("GAUGEWATCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("backend.url", overrides.url.clone())?
            .set_override_option("backend.schema", overrides.schema.map(|s| s.as_str()))?
            .set_override_option("backend.username", overrides.username.clone())?
            .set_override_option("backend.password", overrides.password.clone())?
            .set_override_option("view.refresh_interval", overrides.refresh_interval.clone())?
            .set_override_option("view.sort", overrides.sort.clone())?
            .build()
            .context("Failed to read configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the fields that are kept as strings until use.
    pub fn validate(&self) -> Result<()> {
        self.timeout()?;
        self.refresh_interval()?;
        self.sort_strategy()?;
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.backend.username, &self.backend.password)
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.backend.timeout)
            .with_context(|| format!("Invalid backend.timeout '{}'", self.backend.timeout))
    }

    pub fn refresh_interval(&self) -> Result<RefreshInterval> {
        self.view.refresh_interval.parse()
    }

    pub fn sort_strategy(&self) -> Result<SortStrategy> {
        self.view.sort.parse::<SortStrategy>().map_err(|e| anyhow!(e))
    }

    pub fn pinned(&self) -> Vec<String> {
        parse_id_list(&self.view.pinned)
    }

    pub fn custom_order(&self) -> Vec<String> {
        parse_id_list(&self.view.custom_order)
    }
}

/// Split a comma-separated id list, dropping blanks and repeats.
pub fn parse_id_list(s: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in s.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
