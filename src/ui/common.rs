//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, the alias/tag
//! prompt and the help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the header bar with the overall alert status.
///
/// Displays: status indicator, breached/ok counts, total monitors, schema,
/// and the pinned-monitor ticker.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(" GAUGEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let breached = data.breached_count();
    let active = data.active_count();
    let ok = active - breached;
    let total = data.monitors.len();

    let status_style = if breached > 0 {
        Style::default().fg(app.theme.breached).add_modifier(Modifier::BOLD)
    } else if !data.errors.is_empty() {
        Style::default().fg(app.theme.stale)
    } else {
        Style::default().fg(app.theme.within_bounds)
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("GAUGEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        if breached > 0 {
            Span::styled(
                format!("{}", breached),
                Style::default().fg(app.theme.breached).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" alerting "),
        Span::styled(format!("{}", ok), Style::default().fg(app.theme.within_bounds)),
        Span::raw(" ok │ "),
        Span::styled(format!("{}", total), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" monitors"),
    ];

    if let Some(ref schema) = data.schema {
        spans.push(Span::styled(
            format!(" ({})", schema),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    if let Some(ticker) = app.ticker_text() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            ticker,
            Style::default().fg(app.theme.accent).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let alert_count = app.data.as_ref().map_or(0, |d| d.alerts.len());
    let titles: Vec<Line> = vec![
        Line::from(" 1:Monitors "),
        Line::from(format!(" 2:Alerts ({}) ", alert_count)),
    ];

    let selected = match app.current_view {
        View::Monitors => 0,
        View::Alerts => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.accent));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();

        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            "/:search s:sort a:alias t:tag p:pin r:refresh Enter:detail ?:help q:quit"
        };

        let stale = if data.errors.is_empty() { "" } else { " (stale)" };

        format!(
            " {} | Updated {:.0}s ago{} | {}",
            app.source_description(),
            elapsed.as_secs_f64(),
            stale,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the alias/tag input prompt as a small centered box.
pub fn render_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref prompt) = app.prompt else {
        return;
    };

    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 3u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let prompt_area = Rect::new(x, y, width, height);

    let block = Block::default()
        .title(format!(" {} for {} (Enter:save Esc:cancel) ", prompt.kind.label(), prompt.monitor_id))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.accent));

    let paragraph = Paragraph::new(format!("{}_", prompt.input)).block(block);

    frame.render_widget(Clear, prompt_area);
    frame.render_widget(paragraph, prompt_area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab 1/2     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Monitor detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Lists"),
        Line::from("  /         Filter by name, alias, tag"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort strategy"),
        Line::from(""),
        section(" Annotations"),
        Line::from("  a         Edit alias"),
        Line::from("  t         Add tag"),
        Line::from("  T         Clear tags"),
        Line::from("  p         Pin/unpin (this session)"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export dashboard to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.accent));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 30u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// A full-width band of `height` rows centered vertically in `area`,
/// clipped to the area on short terminals.
pub fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(area.x, y, area.width, height)
}

/// Filter indicator for table titles.
pub fn filter_info(app: &App) -> String {
    if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    }
}

/// Render the last 8 sparkline levels as block characters.
pub fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string(); // 8 spaces placeholder
    }

    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}
