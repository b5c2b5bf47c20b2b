//! Application state and navigation logic.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use gaugewatch_types::Dashboard;

use crate::annotations::{AnnotationStore, Annotations};
use crate::data::{
    pin_first, retain_stale, sort_rows, DashboardData, History, MonitorRow, SortStrategy,
    ALERT_STRATEGIES, MONITOR_STRATEGIES,
};
use crate::settings::{DisplayMode, Settings};
use crate::source::DataSource;
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// Monitor detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every monitor, pinned ones first.
    Monitors,
    /// Only monitors that have an alert config.
    Alerts,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Monitors => View::Alerts,
            View::Alerts => View::Monitors,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Monitors => "Monitors",
            View::Alerts => "Alerts",
        }
    }

    /// Sort strategies offered by this view, in cycling order.
    pub fn strategies(&self) -> &'static [SortStrategy] {
        match self {
            View::Monitors => MONITOR_STRATEGIES,
            View::Alerts => ALERT_STRATEGIES,
        }
    }
}

/// What the text prompt is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Alias,
    Tag,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::Alias => "Alias",
            PromptKind::Tag => "Add tag",
        }
    }
}

/// An open text prompt for one monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub monitor_id: String,
    pub input: String,
}

/// View preferences taken from settings.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub pinned: Vec<String>,
    pub custom_order: Vec<String>,
    pub display_mode: DisplayMode,
    pub monitor_sort: SortStrategy,
    pub export_path: PathBuf,
}

impl ViewOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            pinned: settings.pinned(),
            custom_order: settings.custom_order(),
            display_mode: settings.view.display_mode,
            monitor_sort: settings.sort_strategy()?,
            export_path: settings.storage.dir.join("dashboard_export.json"),
        })
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    dashboard: Option<Dashboard>,
    pub data: Option<DashboardData>,
    pub history: History,
    pub load_error: Option<String>,

    // Local annotations
    store: AnnotationStore,
    pub annotations: Annotations,

    // Navigation state
    pub selected_monitor_index: usize,
    pub selected_alert_index: usize,

    // Sorting
    pub monitor_sort: SortStrategy,
    pub alert_sort: SortStrategy,
    pub custom_order: Vec<String>,

    // Pinned monitors and the header ticker
    pub pinned: Vec<String>,
    pub display_mode: DisplayMode,
    pub ticker_index: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // Alias/tag input
    pub prompt: Option<Prompt>,

    pub export_path: PathBuf,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source` and annotating with `store`.
    pub fn new(
        source: Box<dyn DataSource>,
        store: AnnotationStore,
        options: ViewOptions,
        theme: Theme,
    ) -> Self {
        let annotations = match store.load() {
            Ok(annotations) => annotations,
            Err(e) => {
                warn!(error = %e, "Failed to load annotations");
                Annotations::default()
            }
        };

        Self {
            running: true,
            current_view: View::Monitors,
            show_help: false,
            show_detail_overlay: false,
            source,
            dashboard: None,
            data: None,
            history: History::new(),
            load_error: None,
            store,
            annotations,
            selected_monitor_index: 0,
            selected_alert_index: 0,
            monitor_sort: options.monitor_sort,
            alert_sort: SortStrategy::Status,
            custom_order: options.custom_order,
            pinned: options.pinned,
            display_mode: options.display_mode,
            ticker_index: 0,
            filter_text: String::new(),
            filter_active: false,
            prompt: None,
            export_path: options.export_path,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// The last dashboard received, with stale data retained for failed fetches.
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Ask the source for fresh data.
    pub fn refresh(&mut self) {
        self.source.refresh();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Poll the data source for new data.
    ///
    /// Returns true if a new dashboard was applied. Fetch failures inside the
    /// dashboard are reported once, and the previous data for the failed
    /// resource is kept.
    pub fn reload_data(&mut self) -> bool {
        let Some(mut next) = self.source.poll() else {
            self.load_error = self.source.error().map(str::to_string);
            return false;
        };
        self.load_error = self.source.error().map(str::to_string);

        if let Some(previous) = &self.dashboard {
            retain_stale(previous, &mut next);
        }

        if next.errors.is_empty() {
            if self.get_status_message() == Some("Refreshing...") {
                self.status_message = None;
            }
        } else {
            let message = next
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.resource.label(), e.message))
                .collect::<Vec<_>>()
                .join("; ");
            self.set_status_message(format!("Refresh failed ({})", message));
        }

        debug!(
            monitors = next.monitors.len(),
            configs = next.configs.len(),
            errors = next.errors.len(),
            "Applied dashboard"
        );

        self.dashboard = Some(next);
        self.rebuild();
        if let Some(ref data) = self.data {
            self.history.record(data);
        }
        true
    }

    /// Re-derive rows from the current dashboard and annotations.
    fn rebuild(&mut self) {
        if let Some(ref dashboard) = self.dashboard {
            self.data = Some(DashboardData::from_dashboard(dashboard, &self.annotations));
        }
        self.clamp_selection();
    }

    fn reload_annotations(&mut self) -> Result<()> {
        self.annotations = self.store.load()?;
        self.rebuild();
        Ok(())
    }

    fn clamp_selection(&mut self) {
        let monitors = self.row_count(View::Monitors);
        let alerts = self.row_count(View::Alerts);
        self.selected_monitor_index = self.selected_monitor_index.min(monitors.saturating_sub(1));
        self.selected_alert_index = self.selected_alert_index.min(alerts.saturating_sub(1));
    }

    /// Rows of a view after filtering and sorting, in display order.
    pub fn rows(&self, view: View) -> Vec<&MonitorRow> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };
        let source = match view {
            View::Monitors => &data.monitors,
            View::Alerts => &data.alerts,
        };
        let mut rows: Vec<&MonitorRow> =
            source.iter().filter(|r| r.matches(&self.filter_text)).collect();
        sort_rows(&mut rows, self.sort_for(view), &self.custom_order);
        if view == View::Monitors {
            pin_first(&mut rows, &self.pinned);
        }
        rows
    }

    /// Rows of the current view.
    pub fn visible_rows(&self) -> Vec<&MonitorRow> {
        self.rows(self.current_view)
    }

    fn row_count(&self, view: View) -> usize {
        self.rows(view).len()
    }

    pub fn selected_index(&self) -> usize {
        match self.current_view {
            View::Monitors => self.selected_monitor_index,
            View::Alerts => self.selected_alert_index,
        }
    }

    fn selected_index_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Monitors => &mut self.selected_monitor_index,
            View::Alerts => &mut self.selected_alert_index,
        }
    }

    /// The row under the cursor in the current view.
    pub fn selected_row(&self) -> Option<&MonitorRow> {
        self.visible_rows().into_iter().nth(self.selected_index())
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_row().map(|r| r.id().to_string())
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count(self.current_view).saturating_sub(1);
        let index = self.selected_index_mut();
        *index = (*index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let index = self.selected_index_mut();
        *index = index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selected_index_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.row_count(self.current_view).saturating_sub(1);
        *self.selected_index_mut() = last;
    }

    /// Select a visual row if it exists.
    pub fn select_row(&mut self, row: usize) {
        if row < self.row_count(self.current_view) {
            *self.selected_index_mut() = row;
        }
    }

    /// Open the detail overlay for the selected monitor.
    pub fn enter_detail(&mut self) {
        if self.selected_row().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close the overlay first, then return to the monitors view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        self.current_view = View::Monitors;
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// The active sort strategy of a view.
    pub fn sort_for(&self, view: View) -> SortStrategy {
        match view {
            View::Monitors => self.monitor_sort,
            View::Alerts => self.alert_sort,
        }
    }

    /// Cycle to the next sort strategy for the current view.
    pub fn cycle_sort(&mut self) {
        let strategies = self.current_view.strategies();
        let next = self.sort_for(self.current_view).next_in(strategies);
        match self.current_view {
            View::Monitors => self.monitor_sort = next,
            View::Alerts => self.alert_sort = next,
        }
        if next == SortStrategy::Custom && self.custom_order.is_empty() {
            self.set_status_message("Sort: custom (no custom order configured)".to_string());
        } else {
            self.set_status_message(format!("Sort: {}", next));
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.clamp_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_selection();
    }

    /// Pin or unpin the selected monitor for this session.
    pub fn toggle_pin(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(pos) = self.pinned.iter().position(|p| *p == id) {
            self.pinned.remove(pos);
            self.set_status_message(format!("Unpinned {}", id));
        } else {
            self.pinned.push(id.clone());
            self.set_status_message(format!("Pinned {}", id));
        }
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.iter().any(|p| p == id)
    }

    /// Open the alias prompt for the selected monitor, prefilled with its alias.
    pub fn start_alias_edit(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        self.prompt = Some(Prompt {
            kind: PromptKind::Alias,
            monitor_id: row.id().to_string(),
            input: row.alias.clone().unwrap_or_default(),
        });
    }

    /// Open the tag prompt for the selected monitor.
    pub fn start_tag_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.prompt = Some(Prompt {
            kind: PromptKind::Tag,
            monitor_id: id,
            input: String::new(),
        });
    }

    pub fn prompt_push(&mut self, c: char) {
        if let Some(ref mut prompt) = self.prompt {
            prompt.input.push(c);
        }
    }

    pub fn prompt_pop(&mut self) {
        if let Some(ref mut prompt) = self.prompt {
            prompt.input.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Save the prompt's input. Errors are shown as a status message.
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let result = match prompt.kind {
            PromptKind::Alias => self
                .store
                .set_alias(&prompt.monitor_id, Some(&prompt.input))
                .map(|()| {
                    if prompt.input.trim().is_empty() {
                        format!("Removed alias of {}", prompt.monitor_id)
                    } else {
                        format!("Alias set for {}", prompt.monitor_id)
                    }
                }),
            PromptKind::Tag => self
                .store
                .add_tag(&prompt.monitor_id, &prompt.input)
                .map(|()| format!("Tagged {} with '{}'", prompt.monitor_id, prompt.input.trim())),
        };
        self.finish_annotation(result.map_err(Into::into));
    }

    /// Remove every tag from the selected monitor.
    pub fn clear_tags(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let result = self
            .store
            .clear_tags(&id)
            .map(|()| format!("Cleared tags of {}", id))
            .map_err(Into::into);
        self.finish_annotation(result);
    }

    fn finish_annotation(&mut self, result: Result<String>) {
        let message = match result.and_then(|msg| self.reload_annotations().map(|()| msg)) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "Failed to save annotation");
                format!("Failed to save: {}", e)
            }
        };
        self.set_status_message(message);
    }

    /// Move the header ticker to the next pinned monitor.
    pub fn advance_ticker(&mut self) {
        if !self.pinned.is_empty() {
            self.ticker_index = (self.ticker_index + 1) % self.pinned.len();
        }
    }

    /// Text for the header ticker, according to the display mode.
    pub fn ticker_text(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        if self.display_mode == DisplayMode::AlertCount {
            return Some(format!(
                "{} of {} alerting",
                data.breached_count(),
                data.active_count()
            ));
        }

        let id = self.pinned.get(self.ticker_index % self.pinned.len().max(1))?;
        let row = data.row(id)?;
        let value = row.monitor.formatted_value();
        Some(match self.display_mode {
            DisplayMode::Value => value,
            _ => format!("{}: {}", row.label(), value),
        })
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard as JSON.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref dashboard) = self.dashboard else {
            bail!("No data to export");
        };
        write_dashboard(dashboard, path)
    }
}

/// Write a dashboard as pretty JSON, creating parent directories.
pub fn write_dashboard(dashboard: &Dashboard, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(dashboard)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use gaugewatch_types::{AlertThresholdConfig, Monitor, Resource, Severity};
    use tempfile::TempDir;

    /// Hands out queued dashboards, one per poll.
    #[derive(Debug, Default)]
    struct QueueSource {
        queue: VecDeque<Dashboard>,
    }

    impl DataSource for QueueSource {
        fn poll(&mut self) -> Option<Dashboard> {
            self.queue.pop_front()
        }

        fn description(&self) -> &str {
            "queue"
        }

        fn error(&self) -> Option<&str> {
            None
        }
    }

    fn monitor(id: &str, name: &str, value: f64) -> Monitor {
        Monitor::builder(id).display_name(name).value(value).build()
    }

    fn sample() -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.monitors = vec![
            monitor("m1", "Zeta latency", 150.0),
            monitor("m2", "Alpha queue", 5.0),
            monitor("m3", "Beta errors", 0.0),
        ];
        dashboard.configs = vec![
            AlertThresholdConfig::builder("m1").upper(100.0).severity(Severity::High).build(),
            AlertThresholdConfig::builder("m2").upper(10.0).build(),
        ];
        dashboard
    }

    fn app_with(dashboards: Vec<Dashboard>, options: ViewOptions) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let source = QueueSource {
            queue: dashboards.into(),
        };
        let app = App::new(
            Box::new(source),
            AnnotationStore::new(dir.path()),
            options,
            Theme::dark(),
        );
        (dir, app)
    }

    fn ids(rows: &[&MonitorRow]) -> Vec<String> {
        rows.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_reload_applies_dashboard() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        assert!(app.reload_data());
        assert!(!app.reload_data());

        let data = app.data.as_ref().unwrap();
        assert_eq!(data.monitors.len(), 3);
        assert_eq!(data.breached_count(), 1);
        assert_eq!(app.history.len("m1"), 1);
    }

    #[test]
    fn test_monitor_rows_sorted_by_name() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        assert_eq!(ids(&app.rows(View::Monitors)), vec!["m2", "m3", "m1"]);
    }

    #[test]
    fn test_status_sort_puts_breached_first() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        assert_eq!(app.alert_sort, SortStrategy::Status);
        assert_eq!(ids(&app.rows(View::Alerts)), vec!["m1", "m2"]);
    }

    #[test]
    fn test_pinned_rows_come_first() {
        let options = ViewOptions {
            pinned: vec!["m3".to_string(), "m1".to_string()],
            ..Default::default()
        };
        let (_dir, mut app) = app_with(vec![sample()], options);
        app.reload_data();
        assert_eq!(ids(&app.rows(View::Monitors)), vec!["m3", "m1", "m2"]);
        // Pins do not affect the alerts view
        assert_eq!(ids(&app.rows(View::Alerts)), vec!["m1", "m2"]);
    }

    #[test]
    fn test_toggle_pin() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        app.select_last();
        app.toggle_pin();
        assert_eq!(app.pinned, vec!["m1"]);
        assert_eq!(ids(&app.visible_rows()), vec!["m1", "m2", "m3"]);

        app.select_first();
        app.toggle_pin();
        assert!(!app.is_pinned("m1"));
    }

    #[test]
    fn test_failed_rules_keep_previous_configs() {
        let mut failed = sample();
        failed.configs.clear();
        failed.record_error(Resource::AlertRules, "Request timed out");

        let (_dir, mut app) = app_with(vec![sample(), failed], ViewOptions::default());
        app.reload_data();
        app.reload_data();

        let data = app.data.as_ref().unwrap();
        assert_eq!(data.active_count(), 2);
        assert!(app.get_status_message().unwrap().contains("alert rules: Request timed out"));
    }

    #[test]
    fn test_filter_matches_alias() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        app.select_last();
        app.start_alias_edit();
        for c in "checkout".chars() {
            app.prompt_push(c);
        }
        app.submit_prompt();
        assert!(app.prompt.is_none());
        assert_eq!(app.annotations.alias("m1"), Some("checkout"));

        app.filter_push('c');
        app.filter_push('h');
        assert_eq!(ids(&app.visible_rows()), vec!["m1"]);
        assert_eq!(app.selected_index(), 0);
    }

    #[test]
    fn test_tag_and_clear() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        app.start_tag_edit();
        app.prompt_push('x');
        app.submit_prompt();
        assert_eq!(app.annotations.tags("m2"), &["x".to_string()]);
        assert_eq!(app.selected_row().unwrap().tags, vec!["x"]);

        app.clear_tags();
        assert!(app.annotations.tags("m2").is_empty());
    }

    #[test]
    fn test_empty_tag_reports_error() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        app.start_tag_edit();
        app.submit_prompt();
        assert!(app.get_status_message().unwrap().starts_with("Failed to save"));
    }

    #[test]
    fn test_cycle_sort_per_view() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.cycle_sort();
        assert_eq!(app.monitor_sort, SortStrategy::Value);
        app.set_view(View::Alerts);
        app.cycle_sort();
        assert_eq!(app.alert_sort, SortStrategy::Level);
        assert_eq!(app.monitor_sort, SortStrategy::Value);
    }

    #[test]
    fn test_ticker_rotates_pinned() {
        let options = ViewOptions {
            pinned: vec!["m1".to_string(), "m2".to_string()],
            ..Default::default()
        };
        let (_dir, mut app) = app_with(vec![sample()], options);
        app.reload_data();
        assert_eq!(app.ticker_text().as_deref(), Some("Zeta latency: 150"));
        app.advance_ticker();
        assert_eq!(app.ticker_text().as_deref(), Some("Alpha queue: 5"));
        app.advance_ticker();
        assert_eq!(app.ticker_index, 0);

        app.display_mode = DisplayMode::Value;
        assert_eq!(app.ticker_text().as_deref(), Some("150"));
        app.display_mode = DisplayMode::AlertCount;
        assert_eq!(app.ticker_text().as_deref(), Some("1 of 2 alerting"));
    }

    #[test]
    fn test_ticker_without_pins() {
        let (_dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        app.reload_data();
        assert_eq!(app.ticker_text(), None);
    }

    #[test]
    fn test_export_state() {
        let (dir, mut app) = app_with(vec![sample()], ViewOptions::default());
        let path = dir.path().join("out").join("dashboard.json");
        assert!(app.export_state(&path).is_err());

        app.reload_data();
        app.export_state(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Dashboard = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, *app.dashboard().unwrap());
    }

    #[test]
    fn test_enter_detail_needs_selection() {
        let (_dir, mut app) = app_with(vec![], ViewOptions::default());
        app.enter_detail();
        assert!(!app.show_detail_overlay);
    }
}
