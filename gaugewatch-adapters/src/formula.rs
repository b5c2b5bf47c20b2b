//! Formula schema adapter (`/api/v2`).
//!
//! Monitors are computed from formulas and carry no aggregate statistics.
//! Alert rules store their thresholds inside a condition string, which is
//! parsed by [`crate::condition`]; a rule without a monitor reference
//! applies to every monitor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use gaugewatch_types::{HistoryPoint, Monitor, MonitorKind, Severity, Statistics, Timestamp};

use crate::condition::Condition;
use crate::http::HttpClient;
use crate::wire::{self, path_segment};
use crate::{AdapterError, AlertDraft, AlertRule, Backend, Credentials, SchemaKind, Session};

const PREFIX: &str = "/api/v2";

/// Backend speaking the formula monitor/alert-rule schema.
#[derive(Debug, Clone)]
pub struct FormulaBackend {
    http: HttpClient,
}

impl FormulaBackend {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Create a new builder for configuring the backend.
    pub fn builder() -> FormulaBackendBuilder {
        FormulaBackendBuilder::default()
    }

    fn draft_body(draft: &AlertDraft) -> Result<serde_json::Value, AdapterError> {
        draft.validate()?;
        let condition = Condition::render(draft.monitor_id.as_deref(), draft.upper, draft.lower);
        Ok(serde_json::json!({
            "condition": condition,
            "severity": draft.severity.as_str(),
            "enabled": draft.enabled,
        }))
    }
}

#[async_trait]
impl Backend for FormulaBackend {
    fn schema(&self) -> SchemaKind {
        SchemaKind::Formula
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, AdapterError> {
        self.http.login(&format!("{PREFIX}/login"), credentials).await
    }

    async fn monitors(&self, session: &Session) -> Result<Vec<Monitor>, AdapterError> {
        let page: Page<FormulaMonitor> =
            self.http.get(session, &format!("{PREFIX}/monitors")).await?;
        Ok(page.items.into_iter().map(FormulaMonitor::into_monitor).collect())
    }

    async fn monitor(&self, session: &Session, id: &str) -> Result<Monitor, AdapterError> {
        let path = format!("{PREFIX}/monitors/{}", path_segment(id));
        let raw: FormulaMonitor = self.http.get(session, &path).await?;
        Ok(raw.into_monitor())
    }

    async fn history(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<Vec<HistoryPoint>, AdapterError> {
        let path = format!("{PREFIX}/monitors/{}/history", path_segment(id));
        let raw: FormulaHistory = self.http.get(session, &path).await?;
        let mut points: Vec<HistoryPoint> = raw
            .points
            .into_iter()
            .filter_map(|p| {
                p.value.map(|value| HistoryPoint {
                    at: Timestamp(p.at),
                    value,
                })
            })
            .collect();
        points.sort_by_key(|p| p.at);
        Ok(points)
    }

    async fn alert_rules(&self, session: &Session) -> Result<Vec<AlertRule>, AdapterError> {
        let page: Page<FormulaRule> =
            self.http.get(session, &format!("{PREFIX}/alert-rules")).await?;
        Ok(page.items.into_iter().filter_map(FormulaRule::into_rule).collect())
    }

    async fn create_alert(
        &self,
        session: &Session,
        draft: &AlertDraft,
    ) -> Result<String, AdapterError> {
        let body = Self::draft_body(draft)?;
        self.http
            .create(session, &format!("{PREFIX}/alert-rules"), &body)
            .await
    }

    async fn update_alert(
        &self,
        session: &Session,
        rule_id: &str,
        draft: &AlertDraft,
    ) -> Result<(), AdapterError> {
        let body = Self::draft_body(draft)?;
        let path = format!("{PREFIX}/alert-rules/{}", path_segment(rule_id));
        self.http.send(Method::PUT, session, &path, Some(&body)).await?;
        Ok(())
    }

    async fn delete_alert(&self, session: &Session, rule_id: &str) -> Result<(), AdapterError> {
        let path = format!("{PREFIX}/alert-rules/{}", path_segment(rule_id));
        self.http.send(Method::DELETE, session, &path, None).await?;
        Ok(())
    }

    async fn set_constant(
        &self,
        session: &Session,
        monitor_id: &str,
        value: f64,
    ) -> Result<(), AdapterError> {
        let path = format!("{PREFIX}/constants/{}", path_segment(monitor_id));
        let body = serde_json::json!({ "value": value });
        self.http.send(Method::PUT, session, &path, Some(&body)).await?;
        Ok(())
    }
}

/// Builder for FormulaBackend.
#[derive(Debug, Default)]
pub struct FormulaBackendBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl FormulaBackendBuilder {
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
    pub fn build(self) -> FormulaBackend {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        FormulaBackend::new(HttpClient::new(endpoint, timeout))
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
}

/// Monitor as returned by `GET /api/v2/monitors`.
#[derive(Debug, Deserialize)]
struct FormulaMonitor {
    #[serde(deserialize_with = "wire::id")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formula: Option<String>,
    #[serde(default)]
    constant: bool,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    computed_at: Option<u64>,
    #[serde(default)]
    url: Option<String>,
}

impl FormulaMonitor {
    fn into_monitor(self) -> Monitor {
        Monitor {
            id: self.id,
            display_name: self.name,
            kind: if self.constant {
                MonitorKind::Constant
            } else {
                MonitorKind::Regular
            },
            unit: self.unit,
            current_value: self.value,
            last_updated: Timestamp(self.computed_at.unwrap_or(0)),
            statistics: Statistics::unavailable(),
            source_url: self.url,
            formula: self.formula.filter(|f| !f.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FormulaHistory {
    #[serde(default)]
    points: Vec<FormulaHistoryPoint>,
}

#[derive(Debug, Deserialize)]
struct FormulaHistoryPoint {
    at: u64,
    #[serde(default)]
    value: Option<f64>,
}

/// Alert rule as returned by `GET /api/v2/alert-rules`.
#[derive(Debug, Deserialize)]
struct FormulaRule {
    #[serde(deserialize_with = "wire::id")]
    id: String,
    #[serde(default)]
    condition: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default = "wire::enabled_default")]
    enabled: bool,
    #[serde(default)]
    updated_at: Option<u64>,
}

impl FormulaRule {
    fn into_rule(self) -> Option<AlertRule> {
        let severity = self
            .severity
            .as_deref()
            .and_then(|s| s.parse::<Severity>().ok());
        AlertRule::from_condition(
            self.id,
            &self.condition,
            self.enabled,
            severity,
            Timestamp(self.updated_at.unwrap_or(0)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand_rules;

    #[test]
    fn test_builder_defaults() {
        let backend = FormulaBackend::builder().build();
        assert_eq!(backend.http.endpoint(), "http://localhost:8080");
        assert_eq!(backend.schema(), SchemaKind::Formula);
    }

    #[test]
    fn test_monitor_normalization() {
        let page: Page<FormulaMonitor> = serde_json::from_str(
            r#"{"items": [
                {"id": "m1", "name": "Error rate", "formula": "errors / requests",
                 "unit": "%", "value": 2.5, "computed_at": 1700000000000},
                {"id": "m2", "constant": true, "value": 40, "formula": " "},
                {"id": "m3"}
            ]}"#,
        )
        .unwrap();

        let monitors: Vec<Monitor> = page.items.into_iter().map(FormulaMonitor::into_monitor).collect();

        assert_eq!(monitors[0].formula.as_deref(), Some("errors / requests"));
        assert_eq!(monitors[0].last_updated, Timestamp(1_700_000_000_000));
        assert_eq!(monitors[0].statistics, Statistics::unavailable());

        assert_eq!(monitors[1].kind, MonitorKind::Constant);
        assert_eq!(monitors[1].formula, None);

        assert_eq!(monitors[2].current_value, None);
        assert_eq!(monitors[2].name(), "m3");
    }

    #[test]
    fn test_rules_parse_and_expand() {
        let page: Page<FormulaRule> = serde_json::from_str(
            r#"{"items": [
                {"id": 1, "condition": "${monitor:m1} > 100", "severity": "high"},
                {"id": 2, "condition": "value < 5", "severity": "low"},
                {"id": 3, "condition": "foo bar", "severity": "critical"},
                {"id": 4, "condition": "${monitor:m2} > 1", "enabled": false},
                {"id": 5, "condition": "${monitor:deleted} < 0"}
            ]}"#,
        )
        .unwrap();

        let rules: Vec<AlertRule> = page.items.into_iter().filter_map(FormulaRule::into_rule).collect();
        // "foo bar" is dropped at parse time
        assert_eq!(rules.len(), 4);

        let monitors = vec![Monitor::new("m1"), Monitor::new("m2")];
        let configs = expand_rules(&rules, &monitors);

        // rule 1 -> m1, rule 2 -> m1 and m2, rule 4 disabled, rule 5 dangling
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[0].monitor_id, "m1");
        assert_eq!(configs[0].upper_threshold, Some(100.0));
        assert_eq!(configs[0].severity, Some(Severity::High));
        assert_eq!(configs[1].lower_threshold, Some(5.0));
        assert_eq!(configs[2].monitor_id, "m2");
        assert_eq!(configs[2].rule_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_history_skips_missing_values() {
        let raw: FormulaHistory = serde_json::from_str(
            r#"{"points": [{"at": 2, "value": 1.0}, {"at": 1, "value": null}, {"at": 3, "value": 4}]}"#,
        )
        .unwrap();
        let values: Vec<_> = raw.points.iter().filter_map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 4.0]);
    }

    #[test]
    fn test_draft_body_renders_condition() {
        let draft = AlertDraft::from_input(Some("m1"), Some("90"), Some("10"), Some("high")).unwrap();
        let body = FormulaBackend::draft_body(&draft).unwrap();
        assert_eq!(body["condition"], "${monitor:m1} > 90 || ${monitor:m1} < 10");
        assert_eq!(body["severity"], "high");

        let global = AlertDraft::from_input(None, None, Some("0"), None).unwrap();
        let body = FormulaBackend::draft_body(&global).unwrap();
        assert_eq!(body["condition"], "value < 0");
    }
}
