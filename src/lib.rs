// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # gaugewatch
//!
//! A terminal dashboard and library for watching monitor values against the
//! alert thresholds configured on a remote monitoring backend.
//!
//! The backend may speak the legacy schema (structured thresholds) or the
//! formula schema (thresholds inside a condition string). Both are
//! normalized by [`gaugewatch_adapters`] into the same model, so everything
//! in this crate works on a single [`Dashboard`](types::Dashboard) shape.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(evaluate)│    │(render) │    │         │ │
//! │  └────┬────┘    └────▲─────┘    └─────────┘    └─────────┘ │
//! │       │              │                                      │
//! │       ▼              └── annotations (alias, tags)          │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── BackendSource | FileSource                  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, pins, prompts and export
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) over a live
//!   backend or an exported dashboard file
//! - **[`data`]**: Threshold evaluation ([`is_breached`]), row models, sorting
//!   and value history
//! - **[`annotations`]**: Locally persisted aliases and tags
//! - **[`settings`]**: Layered configuration (file, environment, CLI)
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a live backend, detecting its schema
//! gaugewatch --url http://localhost:8080 -u admin -p secret
//!
//! # View a dashboard exported earlier
//! gaugewatch --file dashboard.json
//!
//! # Create an alert rule
//! gaugewatch alert create --monitor cpu --upper 90 --severity high
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use gaugewatch::{DataSource, FileSource};
//!
//! let mut source = FileSource::new("dashboard.json");
//! assert!(source.poll().is_none());
//! ```
//!
//! ### Fetching a dashboard once
//!
//! ```no_run
//! use gaugewatch::adapters::{collect, BackendBuilder, Credentials};
//! use gaugewatch::{AnnotationStore, DashboardData};
//!
//! # tokio_test::block_on(async {
//! let backend = BackendBuilder::new().endpoint("http://localhost:8080").build();
//! let session = backend.login(&Credentials::new("admin", "secret")).await.unwrap();
//! let dashboard = collect(backend.as_ref(), &session).await;
//!
//! let annotations = AnnotationStore::new(".gaugewatch").load().unwrap();
//! let data = DashboardData::from_dashboard(&dashboard, &annotations);
//! println!("{} of {} alerting", data.breached_count(), data.active_count());
//! # });
//! ```
//!
//! ### Evaluating thresholds
//!
//! ```
//! use gaugewatch::is_breached;
//!
//! assert!(is_breached(Some(120.0), Some(100.0), None));
//! assert!(!is_breached(None, Some(100.0), Some(0.0)));
//! ```

pub mod annotations;
pub mod app;
pub mod data;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

pub use gaugewatch_adapters as adapters;
pub use gaugewatch_types as types;

// Re-export main types for convenience
pub use annotations::{AnnotationStore, Annotations, StoreError};
pub use app::{App, View, ViewOptions};
pub use data::{
    is_breached, sort_rows, DashboardData, History, MonitorRow, RefreshInterval, SortStrategy,
};
pub use settings::{DisplayMode, Settings};
pub use source::{BackendSource, DataSource, FileSource};
pub use ui::Theme;
