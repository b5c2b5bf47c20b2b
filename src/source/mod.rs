//! Data source abstraction for receiving dashboards.
//!
//! A dashboard either comes live from a monitoring backend or from a file
//! written earlier by `gaugewatch export`.

mod backend;
mod file;

pub use backend::BackendSource;
pub use file::FileSource;

use std::fmt::Debug;

use gaugewatch_types::Dashboard;

/// Trait for receiving dashboards from various sources.
///
/// # Example
///
/// ```
/// use gaugewatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("dashboard.json");
/// if let Some(dashboard) = source.poll() {
///     println!("Got {} monitors", dashboard.monitors.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest dashboard.
    ///
    /// Returns `Some(dashboard)` if new data is available, `None` otherwise.
    /// This method must not block.
    fn poll(&mut self) -> Option<Dashboard>;

    /// Ask the source for fresh data. The result shows up in a later `poll`.
    fn refresh(&mut self) {}

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the last poll or refresh, if any.
    fn error(&self) -> Option<&str>;
}
