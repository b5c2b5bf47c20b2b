//! Data models and processing for fetched dashboards.
//!
//! This module turns a normalized [`Dashboard`](gaugewatch_types::Dashboard)
//! into rows ready for display: it evaluates thresholds, applies local
//! annotations, orders rows and tracks value history.
//!
//! ## Submodules
//!
//! - [`alert`]: Threshold evaluation ([`is_breached`]) and the row model
//! - [`sort`]: Sort strategies shared by the monitors and alerts views
//! - [`history`]: Per-monitor value history for sparklines
//! - [`duration`]: Duration parsing and the allowed refresh intervals
//!
//! ## Data Flow
//!
//! ```text
//! Dashboard (from a Backend or an exported file)
//!        │
//!        ▼
//! DashboardData::from_dashboard()  ◀── Annotations (alias, tags)
//!        │
//!        ├──▶ MonitorRow (active/breached computed per config)
//!        │
//!        ├──▶ sort_rows() / pin_first()
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod alert;
pub mod duration;
pub mod history;
pub mod sort;

pub use alert::{is_breached, retain_stale, DashboardData, MonitorRow};
pub use duration::RefreshInterval;
pub use history::History;
pub use sort::{pin_first, sort_rows, SortStrategy, ALERT_STRATEGIES, MONITOR_STRATEGIES};
