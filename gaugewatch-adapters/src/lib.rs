//! # gaugewatch-adapters
//!
//! Backend adapters that translate a monitoring API's monitor and alert-rule
//! resources into the normalized [`gaugewatch_types`] model.
//!
//! ## Supported Schemas
//!
//! - **Legacy** (`/api`) - monitors with statistics, alerts with structured
//!   upper/lower thresholds
//! - **Formula** (`/api/v2`) - formula-computed monitors, alert rules whose
//!   thresholds live in a free-form condition string (see [`condition`])
//! - **Auto** - tries the formula schema and falls back to legacy when the
//!   backend does not offer it
//!
//! Every schema implements the same [`Backend`] trait, so callers pick one by
//! configuration and never branch on it afterwards.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gaugewatch_adapters::{collect, BackendBuilder, Credentials, SchemaKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = BackendBuilder::new()
//!         .endpoint("http://localhost:8080")
//!         .schema(SchemaKind::Auto)
//!         .build();
//!
//!     let session = backend.login(&Credentials::new("admin", "secret")).await?;
//!     let dashboard = collect(backend.as_ref(), &session).await;
//!
//!     println!("Collected {} monitors", dashboard.monitors.len());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{debug, warn};

use gaugewatch_types::{Dashboard, HistoryPoint, Monitor, Resource};

pub mod condition;
pub mod draft;
pub mod error;
pub mod rule;
pub mod session;

#[cfg(feature = "http")]
pub mod auto;
#[cfg(feature = "http")]
pub mod formula;
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub mod legacy;
mod wire;

pub use condition::{Condition, ConditionError};
pub use draft::{AlertDraft, ValidationError};
pub use error::AdapterError;
pub use rule::{expand_rules, AlertRule};
pub use session::{Credentials, Session};

#[cfg(feature = "http")]
pub use auto::AutoBackend;
#[cfg(feature = "http")]
pub use formula::FormulaBackend;
#[cfg(feature = "http")]
pub use legacy::LegacyBackend;

// Re-export types for convenience
pub use gaugewatch_types::{AlertThresholdConfig, Severity};

/// Which upstream schema a backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Legacy,
    Formula,
    #[default]
    Auto,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Legacy => "legacy",
            SchemaKind::Formula => "formula",
            SchemaKind::Auto => "auto",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "v1" => Ok(Self::Legacy),
            "formula" | "v2" => Ok(Self::Formula),
            "auto" => Ok(Self::Auto),
            other => Err(format!("unknown backend schema: {other}")),
        }
    }
}

/// A monitoring backend, normalized.
///
/// Every call takes the [`Session`] explicitly; implementations hold no
/// authentication state of their own.
#[async_trait]
pub trait Backend: Send + Sync + fmt::Debug {
    /// The schema this backend speaks. An auto-detecting backend reports
    /// the schema that answered, or [`SchemaKind::Auto`] before the first call.
    fn schema(&self) -> SchemaKind;

    /// Exchange credentials for a session token.
    async fn login(&self, credentials: &Credentials) -> Result<Session, AdapterError>;

    /// All monitors.
    async fn monitors(&self, session: &Session) -> Result<Vec<Monitor>, AdapterError>;

    /// A single monitor.
    async fn monitor(&self, session: &Session, id: &str) -> Result<Monitor, AdapterError>;

    /// Value history of a monitor, oldest first.
    async fn history(&self, session: &Session, id: &str)
        -> Result<Vec<HistoryPoint>, AdapterError>;

    /// All alert rules, normalized but not yet expanded.
    ///
    /// Rules whose condition cannot be parsed are dropped here.
    async fn alert_rules(&self, session: &Session) -> Result<Vec<AlertRule>, AdapterError>;

    /// Create an alert rule, returning its id.
    async fn create_alert(&self, session: &Session, draft: &AlertDraft)
        -> Result<String, AdapterError>;

    /// Replace an existing alert rule.
    async fn update_alert(
        &self,
        session: &Session,
        rule_id: &str,
        draft: &AlertDraft,
    ) -> Result<(), AdapterError>;

    /// Delete an alert rule.
    async fn delete_alert(&self, session: &Session, rule_id: &str) -> Result<(), AdapterError>;

    /// Set the value of a constant monitor.
    async fn set_constant(
        &self,
        session: &Session,
        monitor_id: &str,
        value: f64,
    ) -> Result<(), AdapterError>;
}

/// Fetch monitors and alert rules concurrently and normalize them.
///
/// A failed fetch leaves its list empty and is recorded in
/// [`Dashboard::errors`]; this function never fails as a whole.
pub async fn collect(backend: &dyn Backend, session: &Session) -> Dashboard {
    let (monitors, rules) = tokio::join!(backend.monitors(session), backend.alert_rules(session));

    let mut dashboard = Dashboard::new();

    let monitors = match monitors {
        Ok(monitors) => monitors,
        Err(e) => {
            warn!(error = %e, "Failed to fetch monitors");
            dashboard.record_error(Resource::Monitors, e.to_string());
            Vec::new()
        }
    };

    let rules = match rules {
        Ok(rules) => rules,
        Err(e) => {
            warn!(error = %e, "Failed to fetch alert rules");
            dashboard.record_error(Resource::AlertRules, e.to_string());
            Vec::new()
        }
    };

    dashboard.configs = expand_rules(&rules, &monitors);
    dashboard.monitors = monitors;
    dashboard.schema = Some(backend.schema().as_str().to_string());

    debug!(
        monitors = dashboard.monitors.len(),
        rules = rules.len(),
        configs = dashboard.configs.len(),
        "Collected dashboard"
    );

    dashboard
}

/// Builder that picks a backend implementation by schema.
#[cfg(feature = "http")]
#[derive(Debug, Default)]
pub struct BackendBuilder {
    endpoint: Option<String>,
    timeout: Option<std::time::Duration>,
    schema: SchemaKind,
}

#[cfg(feature = "http")]
impl BackendBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API endpoint (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Select the upstream schema (default: auto).
    pub fn schema(mut self, schema: SchemaKind) -> Self {
        self.schema = schema;
        self
    }

    /// Build the backend.
    pub fn build(self) -> Box<dyn Backend> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let timeout = self.timeout.unwrap_or(std::time::Duration::from_secs(10));
        let client = http::HttpClient::new(endpoint, timeout);

        match self.schema {
            SchemaKind::Legacy => Box::new(LegacyBackend::new(client)),
            SchemaKind::Formula => Box::new(FormulaBackend::new(client)),
            SchemaKind::Auto => Box::new(AutoBackend::new(
                Box::new(FormulaBackend::new(client.clone())),
                Box::new(LegacyBackend::new(client)),
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process backend with canned responses.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug)]
    pub struct FakeBackend {
        pub schema: SchemaKind,
        pub monitors: Result<Vec<Monitor>, fn() -> AdapterError>,
        pub rules: Result<Vec<AlertRule>, fn() -> AdapterError>,
        pub calls: AtomicUsize,
        pub constants: Mutex<Vec<(String, f64)>>,
    }

    impl FakeBackend {
        pub fn new(schema: SchemaKind) -> Self {
            Self {
                schema,
                monitors: Ok(Vec::new()),
                rules: Ok(Vec::new()),
                calls: AtomicUsize::new(0),
                constants: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        fn schema(&self) -> SchemaKind {
            self.schema
        }

        async fn login(&self, credentials: &Credentials) -> Result<Session, AdapterError> {
            self.hit();
            if credentials.password == "wrong" {
                return Err(AdapterError::Auth("Invalid credentials".to_string()));
            }
            Ok(Session::new(format!("{}-token", self.schema)))
        }

        async fn monitors(&self, _session: &Session) -> Result<Vec<Monitor>, AdapterError> {
            self.hit();
            self.monitors.clone().map_err(|e| e())
        }

        async fn monitor(&self, _session: &Session, id: &str) -> Result<Monitor, AdapterError> {
            self.hit();
            let monitors = self.monitors.clone().map_err(|e| e())?;
            monitors
                .into_iter()
                .find(|m| m.id == id)
                .ok_or_else(|| AdapterError::NotFound(id.to_string()))
        }

        async fn history(
            &self,
            _session: &Session,
            _id: &str,
        ) -> Result<Vec<HistoryPoint>, AdapterError> {
            self.hit();
            Ok(Vec::new())
        }

        async fn alert_rules(&self, _session: &Session) -> Result<Vec<AlertRule>, AdapterError> {
            self.hit();
            self.rules.clone().map_err(|e| e())
        }

        async fn create_alert(
            &self,
            _session: &Session,
            _draft: &AlertDraft,
        ) -> Result<String, AdapterError> {
            self.hit();
            Ok("new-rule".to_string())
        }

        async fn update_alert(
            &self,
            _session: &Session,
            _rule_id: &str,
            _draft: &AlertDraft,
        ) -> Result<(), AdapterError> {
            self.hit();
            Ok(())
        }

        async fn delete_alert(&self, _session: &Session, _rule_id: &str) -> Result<(), AdapterError> {
            self.hit();
            Ok(())
        }

        async fn set_constant(
            &self,
            _session: &Session,
            monitor_id: &str,
            value: f64,
        ) -> Result<(), AdapterError> {
            self.hit();
            if let Ok(mut constants) = self.constants.lock() {
                constants.push((monitor_id.to_string(), value));
            }
            Ok(())
        }
    }
}
