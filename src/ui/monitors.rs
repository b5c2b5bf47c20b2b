//! Monitors view rendering.
//!
//! Displays a table of every monitor with its value, thresholds, local
//! annotations, a sparkline trend and alert status. Pinned monitors are
//! listed first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, View};
use crate::ui::common::{filter_info, render_sparkline};
use crate::ui::theme::status_symbol;

/// Render the monitors view as a table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let rows = app.rows(View::Monitors);

    let header = Row::new(vec![
        Cell::from("Monitor"),
        Cell::from("Value"),
        Cell::from("Thresholds"),
        Cell::from("Tags"),
        Cell::from("Trend"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let status_style = app.theme.status_style(row);

            let mut name = Vec::new();
            if app.is_pinned(row.id()) {
                name.push(Span::styled("★ ", Style::default().fg(app.theme.accent)));
            }
            name.push(Span::raw(row.label().to_string()));
            if row.alias.is_some() {
                name.push(Span::styled(
                    format!(" ({})", row.name()),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }

            let thresholds = row
                .config
                .as_ref()
                .map(|c| c.describe_bounds())
                .unwrap_or_else(|| "-".to_string());

            let tags = if row.tags.is_empty() {
                "-".to_string()
            } else {
                row.tags.join(",")
            };

            let sparkline = render_sparkline(&app.history.sparkline(row.id()));

            Row::new(vec![
                Cell::from(Line::from(name)),
                Cell::from(row.monitor.formatted_value()).style(status_style),
                Cell::from(thresholds),
                Cell::from(tags).style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(sparkline),
                Cell::from(status_symbol(row)).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),   // Monitor - gets 3x share (largest)
        Constraint::Fill(1),   // Value
        Constraint::Fill(1),   // Thresholds
        Constraint::Fill(1),   // Tags
        Constraint::Min(8),    // Trend/Sparkline - fixed 8 for sparkline chars
        Constraint::Min(8),    // Status
    ];

    let selected = app.selected_monitor_index.min(rows.len().saturating_sub(1));

    let position_info = if !rows.is_empty() {
        format!(" [{}/{}]", selected + 1, rows.len())
    } else {
        String::new()
    };

    let title = format!(
        " Monitors ({}/{}) [s:sort {}]{}{} ",
        rows.len(),
        data.monitors.len(),
        app.monitor_sort,
        filter_info(app),
        position_info
    );

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
