use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use gaugewatch_types::{Resource, Timestamp};

use crate::app::{App, View};
use crate::data::duration::format_age;
use crate::ui::common::filter_info;

/// Render the alerts view: one row per monitor/config pair.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    if data.alerts.is_empty() {
        render_empty_message(frame, app, area);
        return;
    }

    let rows = app.rows(View::Alerts);
    let breached = rows.iter().filter(|r| r.breached).count();

    let header = Row::new(vec![
        Cell::from("Status"),
        Cell::from("Level"),
        Cell::from("Monitor"),
        Cell::from("Value"),
        Cell::from("Bounds"),
        Cell::from("Rule"),
        Cell::from("Updated"),
    ])
    .height(1)
    .style(app.theme.header);

    let now = Timestamp::now();
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let status_style = app.theme.status_style(row);
            let status_label = if row.breached { "ALERT" } else { "OK" };

            let severity = row.config.as_ref().and_then(|c| c.severity);
            let level = severity.map(|s| s.as_str()).unwrap_or("?");

            let rule = row
                .config
                .as_ref()
                .and_then(|c| c.rule_id.clone())
                .unwrap_or_else(|| "-".to_string());

            let bounds = row
                .config
                .as_ref()
                .map(|c| c.describe_bounds())
                .unwrap_or_else(|| "-".to_string());

            let updated = if row.monitor.last_updated.as_millis() == 0 {
                "-".to_string()
            } else {
                format!("{} ago", format_age(row.monitor.last_updated.age(now)))
            };

            Row::new(vec![
                Cell::from(status_label).style(status_style),
                Cell::from(level).style(app.theme.severity_style(severity)),
                Cell::from(row.label().to_string())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(row.monitor.formatted_value()).style(status_style),
                Cell::from(bounds),
                Cell::from(rule).style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(updated).style(Style::default().add_modifier(Modifier::DIM)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(7),  // Status - fixed
        Constraint::Length(9),  // Level - fixed
        Constraint::Fill(3),    // Monitor - 3x share
        Constraint::Fill(1),    // Value
        Constraint::Fill(2),    // Bounds
        Constraint::Fill(1),    // Rule
        Constraint::Length(10), // Updated - fixed
    ];

    let selected = app.selected_alert_index.min(rows.len().saturating_sub(1));
    let position_info = if !rows.is_empty() {
        format!(" [{}/{}]", selected + 1, rows.len())
    } else {
        String::new()
    };

    let title = format!(
        " Alerts ({} alerting of {}) [s:sort {}]{}{} ",
        breached,
        rows.len(),
        app.alert_sort,
        filter_info(app),
        position_info
    );

    let border_color = if breached > 0 {
        app.theme.breached
    } else {
        app.theme.border
    };

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(border_color)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_empty_message(frame: &mut Frame, app: &App, area: Rect) {
    let rules_failed = app
        .data
        .as_ref()
        .and_then(|d| d.errors.iter().find(|e| e.resource == Resource::AlertRules))
        .is_some();

    let (color, icon, headline, detail) = if rules_failed {
        (
            app.theme.stale,
            "    ! ",
            "Alert rules unavailable",
            "      The last fetch of alert rules failed. Press r to retry.",
        )
    } else {
        (
            app.theme.within_bounds,
            "    ✓ ",
            "No alerts configured",
            "      No enabled alert rule targets a known monitor.",
        )
    };

    let block = Block::default()
        .title(" Alerts ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(color));

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(icon, Style::default().fg(color)),
            Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            detail,
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
