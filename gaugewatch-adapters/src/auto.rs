//! Schema auto-detection.
//!
//! [`AutoBackend`] sends each call to the primary (formula) backend until one
//! answers. If the primary reports that the resource does not exist or the
//! method is unsupported, the same call is retried on the fallback (legacy)
//! backend. Whichever schema first answers successfully is remembered and
//! used for every later call.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use gaugewatch_types::{HistoryPoint, Monitor};

use crate::{AdapterError, AlertDraft, AlertRule, Backend, Credentials, SchemaKind, Session};

const UNRESOLVED: u8 = 0;
const PRIMARY: u8 = 1;
const FALLBACK: u8 = 2;

/// Backend that picks between two schemas at runtime.
#[derive(Debug)]
pub struct AutoBackend {
    primary: Box<dyn Backend>,
    fallback: Box<dyn Backend>,
    resolved: AtomicU8,
}

impl AutoBackend {
    pub fn new(primary: Box<dyn Backend>, fallback: Box<dyn Backend>) -> Self {
        Self {
            primary,
            fallback,
            resolved: AtomicU8::new(UNRESOLVED),
        }
    }

    /// True once a schema has answered.
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire) != UNRESOLVED
    }

    fn resolve(&self, which: u8) {
        if self
            .resolved
            .compare_exchange(UNRESOLVED, which, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let schema = if which == PRIMARY {
                self.primary.schema()
            } else {
                self.fallback.schema()
            };
            info!(%schema, "Detected backend schema");
        }
    }

    async fn route<'a, T, F, Fut>(&'a self, call: F) -> Result<T, AdapterError>
    where
        F: Fn(&'a dyn Backend) -> Fut,
        Fut: Future<Output = Result<T, AdapterError>>,
    {
        match self.resolved.load(Ordering::Acquire) {
            PRIMARY => return call(self.primary.as_ref()).await,
            FALLBACK => return call(self.fallback.as_ref()).await,
            _ => {}
        }

        match call(self.primary.as_ref()).await {
            Ok(value) => {
                self.resolve(PRIMARY);
                Ok(value)
            }
            Err(e) if e.is_schema_mismatch() => {
                debug!(error = %e, "Primary schema unavailable, trying fallback");
                let result = call(self.fallback.as_ref()).await;
                if result.is_ok() {
                    self.resolve(FALLBACK);
                }
                result
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Backend for AutoBackend {
    fn schema(&self) -> SchemaKind {
        match self.resolved.load(Ordering::Acquire) {
            PRIMARY => self.primary.schema(),
            FALLBACK => self.fallback.schema(),
            _ => SchemaKind::Auto,
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, AdapterError> {
        self.route(|b| b.login(credentials)).await
    }

    async fn monitors(&self, session: &Session) -> Result<Vec<Monitor>, AdapterError> {
        self.route(|b| b.monitors(session)).await
    }

    async fn monitor(&self, session: &Session, id: &str) -> Result<Monitor, AdapterError> {
        self.route(|b| b.monitor(session, id)).await
    }

    async fn history(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<Vec<HistoryPoint>, AdapterError> {
        self.route(|b| b.history(session, id)).await
    }

    async fn alert_rules(&self, session: &Session) -> Result<Vec<AlertRule>, AdapterError> {
        self.route(|b| b.alert_rules(session)).await
    }

    async fn create_alert(
        &self,
        session: &Session,
        draft: &AlertDraft,
    ) -> Result<String, AdapterError> {
        self.route(|b| b.create_alert(session, draft)).await
    }

    async fn update_alert(
        &self,
        session: &Session,
        rule_id: &str,
        draft: &AlertDraft,
    ) -> Result<(), AdapterError> {
        self.route(|b| b.update_alert(session, rule_id, draft)).await
    }

    async fn delete_alert(&self, session: &Session, rule_id: &str) -> Result<(), AdapterError> {
        self.route(|b| b.delete_alert(session, rule_id)).await
    }

    async fn set_constant(
        &self,
        session: &Session,
        monitor_id: &str,
        value: f64,
    ) -> Result<(), AdapterError> {
        self.route(|b| b.set_constant(session, monitor_id, value)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::FakeBackend;

    /// Lets a test keep a handle on a backend it also hands to `AutoBackend`.
    #[derive(Debug)]
    struct Shared(Arc<FakeBackend>);

    #[async_trait]
    impl Backend for Shared {
        fn schema(&self) -> SchemaKind {
            self.0.schema()
        }
        async fn login(&self, c: &Credentials) -> Result<Session, AdapterError> {
            self.0.login(c).await
        }
        async fn monitors(&self, s: &Session) -> Result<Vec<Monitor>, AdapterError> {
            self.0.monitors(s).await
        }
        async fn monitor(&self, s: &Session, id: &str) -> Result<Monitor, AdapterError> {
            self.0.monitor(s, id).await
        }
        async fn history(&self, s: &Session, id: &str) -> Result<Vec<HistoryPoint>, AdapterError> {
            self.0.history(s, id).await
        }
        async fn alert_rules(&self, s: &Session) -> Result<Vec<AlertRule>, AdapterError> {
            self.0.alert_rules(s).await
        }
        async fn create_alert(&self, s: &Session, d: &AlertDraft) -> Result<String, AdapterError> {
            self.0.create_alert(s, d).await
        }
        async fn update_alert(
            &self,
            s: &Session,
            id: &str,
            d: &AlertDraft,
        ) -> Result<(), AdapterError> {
            self.0.update_alert(s, id, d).await
        }
        async fn delete_alert(&self, s: &Session, id: &str) -> Result<(), AdapterError> {
            self.0.delete_alert(s, id).await
        }
        async fn set_constant(&self, s: &Session, id: &str, v: f64) -> Result<(), AdapterError> {
            self.0.set_constant(s, id, v).await
        }
    }

    fn auto(primary: FakeBackend, fallback: FakeBackend) -> (AutoBackend, Arc<FakeBackend>, Arc<FakeBackend>) {
        let primary = Arc::new(primary);
        let fallback = Arc::new(fallback);
        let backend = AutoBackend::new(
            Box::new(Shared(Arc::clone(&primary))),
            Box::new(Shared(Arc::clone(&fallback))),
        );
        (backend, primary, fallback)
    }

    #[tokio::test]
    async fn test_falls_back_on_not_found_and_remembers() {
        let mut formula = FakeBackend::new(SchemaKind::Formula);
        formula.monitors = Err(|| AdapterError::NotFound("/api/v2/monitors".into()));
        let mut legacy = FakeBackend::new(SchemaKind::Legacy);
        legacy.monitors = Ok(vec![Monitor::new("m1")]);

        let (backend, primary, fallback) = auto(formula, legacy);
        assert_eq!(backend.schema(), SchemaKind::Auto);

        let session = Session::new("t");
        let monitors = backend.monitors(&session).await.unwrap();
        assert_eq!(monitors.len(), 1);
        assert_eq!(backend.schema(), SchemaKind::Legacy);
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);

        backend.alert_rules(&session).await.unwrap();
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 2);
    }

    #[tokio::test]
    async fn test_primary_success_resolves_primary() {
        let (backend, primary, fallback) = auto(
            FakeBackend::new(SchemaKind::Formula),
            FakeBackend::new(SchemaKind::Legacy),
        );

        let session = backend.login(&Credentials::new("admin", "pw")).await.unwrap();
        assert_eq!(session.token(), "formula-token");
        assert!(backend.is_resolved());
        assert_eq!(backend.schema(), SchemaKind::Formula);

        backend.set_constant(&session, "budget", 0.0).await.unwrap();
        assert_eq!(fallback.calls(), 0);
        assert_eq!(
            primary.constants.lock().unwrap().as_slice(),
            &[("budget".to_string(), 0.0)]
        );
    }

    #[tokio::test]
    async fn test_other_errors_do_not_fall_back() {
        let mut formula = FakeBackend::new(SchemaKind::Formula);
        formula.monitors = Err(|| AdapterError::Timeout);

        let (backend, _primary, fallback) = auto(formula, FakeBackend::new(SchemaKind::Legacy));

        let err = backend.monitors(&Session::new("t")).await.unwrap_err();
        assert!(matches!(err, AdapterError::Timeout));
        assert_eq!(fallback.calls(), 0);
        assert!(!backend.is_resolved());
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_a_schema_mismatch() {
        let (backend, _primary, fallback) = auto(
            FakeBackend::new(SchemaKind::Formula),
            FakeBackend::new(SchemaKind::Legacy),
        );

        let err = backend
            .login(&Credentials::new("admin", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Auth(_)));
        assert_eq!(fallback.calls(), 0);
    }
}
