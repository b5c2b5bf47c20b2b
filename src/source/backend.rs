//! Live data source backed by a monitoring API.
//!
//! Each refresh spawns a [`collect`] task on the runtime; finished dashboards
//! come back over a channel and `poll` hands out the newest one.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::debug;

use gaugewatch_adapters::{collect, Backend, Session};
use gaugewatch_types::Dashboard;

use super::DataSource;

/// A data source that fetches dashboards from a [`Backend`] on demand.
///
/// Refreshes may overlap and complete in any order. Whichever finishes last
/// replaces the data.
#[derive(Debug)]
pub struct BackendSource {
    backend: Arc<dyn Backend>,
    session: Session,
    runtime: Handle,
    sender: mpsc::UnboundedSender<Dashboard>,
    receiver: mpsc::UnboundedReceiver<Dashboard>,
    description: String,
    last_error: Option<String>,
}

impl BackendSource {
    /// Create a source for an authenticated backend.
    ///
    /// Nothing is fetched until the first [`DataSource::refresh`].
    pub fn new(backend: Arc<dyn Backend>, session: Session, runtime: Handle, endpoint: &str) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            backend,
            session,
            runtime,
            sender,
            receiver,
            description: format!("backend: {}", endpoint),
            last_error: None,
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl DataSource for BackendSource {
    fn poll(&mut self) -> Option<Dashboard> {
        let mut latest = None;
        while let Ok(dashboard) = self.receiver.try_recv() {
            latest = Some(dashboard);
        }

        let dashboard = latest?;
        self.last_error = if dashboard.errors.is_empty() {
            None
        } else {
            Some(
                dashboard
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.resource.label(), e.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };
        Some(dashboard)
    }

    fn refresh(&mut self) {
        let backend = self.backend.clone();
        let session = self.session.clone();
        let sender = self.sender.clone();

        self.runtime.spawn(async move {
            let started = Instant::now();
            let dashboard = collect(backend.as_ref(), &session).await;
            debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                monitors = dashboard.monitors.len(),
                "Refresh complete"
            );
            // The receiver is gone once the view has closed.
            let _ = sender.send(dashboard);
        });
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
