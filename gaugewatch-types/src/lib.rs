//! # gaugewatch-types
//!
//! The normalized data model every gaugewatch view works from. Backend
//! adapters translate whatever shape an upstream monitoring API returns into
//! these types, so nothing downstream needs to know which schema answered.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature for JSON export/import
//! - **Always-present fields**: Data a backend cannot supply is an explicit `None`,
//!   never a missing field
//! - **Ergonomic builders**: Fluent API for constructing monitors and configs in tests
//!
//! ## Example
//!
//! ```rust
//! use gaugewatch_types::{AlertThresholdConfig, Monitor, Severity};
//!
//! let monitor = Monitor::builder("cpu-load")
//!     .display_name("CPU load")
//!     .unit("%")
//!     .value(87.5)
//!     .build();
//!
//! let config = AlertThresholdConfig::builder("cpu-load")
//!     .upper(80.0)
//!     .severity(Severity::High)
//!     .build();
//!
//! assert_eq!(monitor.name(), "CPU load");
//! assert!(config.is_configured());
//! ```

mod alert;
mod dashboard;
mod monitor;
mod timestamp;

pub use alert::*;
pub use dashboard::*;
pub use monitor::*;
pub use timestamp::*;
