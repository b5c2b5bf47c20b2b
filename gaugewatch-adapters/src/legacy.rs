//! Legacy schema adapter (`/api`).
//!
//! The legacy backend reports aggregate statistics with each monitor and
//! stores alerts with structured thresholds, so no condition parsing is
//! needed. Every alert targets exactly one monitor.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gaugewatch_adapters::{Backend, Credentials, LegacyBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = LegacyBackend::builder()
//!         .endpoint("http://localhost:8080")
//!         .build();
//!
//!     let session = backend.login(&Credentials::new("admin", "secret")).await?;
//!     for monitor in backend.monitors(&session).await? {
//!         println!("{}: {}", monitor.name(), monitor.formatted_value());
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use gaugewatch_types::{HistoryPoint, Monitor, MonitorKind, Severity, Statistics, Timestamp};

use crate::http::HttpClient;
use crate::wire::{self, path_segment};
use crate::{AdapterError, AlertDraft, AlertRule, Backend, Credentials, SchemaKind, Session};

const PREFIX: &str = "/api";

/// Backend speaking the legacy monitor/alert schema.
#[derive(Debug, Clone)]
pub struct LegacyBackend {
    http: HttpClient,
}

impl LegacyBackend {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Create a new builder for configuring the backend.
    pub fn builder() -> LegacyBackendBuilder {
        LegacyBackendBuilder::default()
    }

    fn draft_body(draft: &AlertDraft) -> Result<serde_json::Value, AdapterError> {
        draft.validate()?;
        let monitor_id = draft.monitor_id.as_deref().ok_or_else(|| {
            AdapterError::Unsupported("the legacy schema has no global alerts".to_string())
        })?;
        Ok(serde_json::json!({
            "monitor_id": monitor_id,
            "upper": draft.upper,
            "lower": draft.lower,
            "level": draft.severity.as_str(),
            "enabled": draft.enabled,
        }))
    }
}

#[async_trait]
impl Backend for LegacyBackend {
    fn schema(&self) -> SchemaKind {
        SchemaKind::Legacy
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, AdapterError> {
        self.http.login(&format!("{PREFIX}/login"), credentials).await
    }

    async fn monitors(&self, session: &Session) -> Result<Vec<Monitor>, AdapterError> {
        let raw: Vec<LegacyMonitor> = self.http.get(session, &format!("{PREFIX}/monitors")).await?;
        Ok(raw.into_iter().map(LegacyMonitor::into_monitor).collect())
    }

    async fn monitor(&self, session: &Session, id: &str) -> Result<Monitor, AdapterError> {
        let path = format!("{PREFIX}/monitors/{}", path_segment(id));
        let raw: LegacyMonitor = self.http.get(session, &path).await?;
        Ok(raw.into_monitor())
    }

    async fn history(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<Vec<HistoryPoint>, AdapterError> {
        let path = format!("{PREFIX}/monitors/{}/history", path_segment(id));
        let raw: Vec<LegacyHistoryPoint> = self.http.get(session, &path).await?;
        let mut points: Vec<HistoryPoint> = raw
            .into_iter()
            .map(|p| HistoryPoint {
                at: Timestamp(p.timestamp),
                value: p.value,
            })
            .collect();
        points.sort_by_key(|p| p.at);
        Ok(points)
    }

    async fn alert_rules(&self, session: &Session) -> Result<Vec<AlertRule>, AdapterError> {
        let raw: Vec<LegacyAlert> = self.http.get(session, &format!("{PREFIX}/alerts")).await?;
        Ok(raw.into_iter().map(LegacyAlert::into_rule).collect())
    }

    async fn create_alert(
        &self,
        session: &Session,
        draft: &AlertDraft,
    ) -> Result<String, AdapterError> {
        let body = Self::draft_body(draft)?;
        self.http
            .create(session, &format!("{PREFIX}/alerts"), &body)
            .await
    }

    async fn update_alert(
        &self,
        session: &Session,
        rule_id: &str,
        draft: &AlertDraft,
    ) -> Result<(), AdapterError> {
        let body = Self::draft_body(draft)?;
        let path = format!("{PREFIX}/alerts/{}", path_segment(rule_id));
        self.http.send(Method::PUT, session, &path, Some(&body)).await?;
        Ok(())
    }

    async fn delete_alert(&self, session: &Session, rule_id: &str) -> Result<(), AdapterError> {
        let path = format!("{PREFIX}/alerts/{}", path_segment(rule_id));
        self.http.send(Method::DELETE, session, &path, None).await?;
        Ok(())
    }

    async fn set_constant(
        &self,
        session: &Session,
        monitor_id: &str,
        value: f64,
    ) -> Result<(), AdapterError> {
        let path = format!("{PREFIX}/monitors/{}/value", path_segment(monitor_id));
        let body = serde_json::json!({ "value": value });
        self.http.send(Method::PUT, session, &path, Some(&body)).await?;
        Ok(())
    }
}

/// Builder for LegacyBackend.
#[derive(Debug, Default)]
pub struct LegacyBackendBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl LegacyBackendBuilder {
    /// Set the API endpoint (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the backend.
    pub fn build(self) -> LegacyBackend {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        LegacyBackend::new(HttpClient::new(endpoint, timeout))
    }
}

/// Monitor as returned by `GET /api/monitors`.
#[derive(Debug, Deserialize)]
struct LegacyMonitor {
    #[serde(deserialize_with = "wire::id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    updated_at: Option<u64>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    avg: Option<f64>,
    #[serde(default)]
    url: Option<String>,
}

impl LegacyMonitor {
    fn into_monitor(self) -> Monitor {
        let kind = match self.kind.as_deref() {
            Some(k) if k.eq_ignore_ascii_case("constant") => MonitorKind::Constant,
            _ => MonitorKind::Regular,
        };
        Monitor {
            id: self.id,
            display_name: self.name,
            kind,
            unit: self.unit,
            current_value: self.value,
            last_updated: Timestamp(self.updated_at.unwrap_or(0)),
            statistics: Statistics {
                min: self.min,
                max: self.max,
                average: self.avg,
            },
            source_url: self.url,
            formula: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LegacyHistoryPoint {
    timestamp: u64,
    value: f64,
}

/// Alert as returned by `GET /api/alerts`.
#[derive(Debug, Deserialize)]
struct LegacyAlert {
    #[serde(deserialize_with = "wire::id")]
    id: String,
    #[serde(deserialize_with = "wire::id")]
    monitor_id: String,
    #[serde(default)]
    upper: Option<f64>,
    #[serde(default)]
    lower: Option<f64>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default = "wire::enabled_default")]
    enabled: bool,
    #[serde(default)]
    updated_at: Option<u64>,
}

impl LegacyAlert {
    fn into_rule(self) -> AlertRule {
        AlertRule {
            id: self.id,
            enabled: self.enabled,
            severity: self.level.as_deref().and_then(|l| l.parse::<Severity>().ok()),
            monitor_id: Some(self.monitor_id),
            upper: self.upper,
            lower: self.lower,
            updated_at: Timestamp(self.updated_at.unwrap_or(0)),
        }
    }
}
