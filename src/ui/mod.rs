//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`monitors`]: Table of every monitor with value, thresholds and trend
//! - [`alerts`]: Monitors that have an alert config, breached first
//! - [`detail`]: Modal overlay with everything known about one monitor
//! - [`common`]: Shared components (header, tabs, status bar, prompt, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (monitors/alerts::render)            │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_prompt
//!    - common::render_help
//! ```

pub mod alerts;
pub mod common;
pub mod detail;
pub mod monitors;
pub mod theme;

pub use theme::Theme;
