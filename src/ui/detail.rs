//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected monitor.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use gaugewatch_types::{format_number, Timestamp};

use crate::app::App;
use crate::data::duration::format_age;
use crate::ui::common::render_sparkline;
use crate::ui::theme::status_symbol;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the monitor detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(row) = app.selected_row() else {
        return;
    };
    let monitor = &row.monitor;

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(5), // Name, value, status
        Constraint::Min(8),    // Fields
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(row);
    let mut title = vec![Span::styled(
        format!(" {} ", row.label()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if row.alias.is_some() {
        title.push(Span::styled(
            format!("({}) ", monitor.name()),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    if app.is_pinned(row.id()) {
        title.push(Span::styled("★ pinned", Style::default().fg(app.theme.accent)));
    }

    let header_lines = vec![
        Line::from(title),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Value: "),
            Span::styled(monitor.formatted_value(), status_style.add_modifier(Modifier::BOLD)),
            Span::raw("    Status: "),
            Span::styled(status_symbol(row), status_style.add_modifier(Modifier::BOLD)),
            Span::raw("    Trend: "),
            Span::raw(render_sparkline(&app.history.sparkline(row.id()))),
        ]),
    ];

    let header_block = Block::default()
        .title(" Monitor Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.accent));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== FIELDS =====
    let dim = Style::default().add_modifier(Modifier::DIM);
    let field = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(format!(" {:<12}", label), dim), Span::raw(value)])
    };
    let or_dash = |v: Option<f64>| v.map(format_number).unwrap_or_else(|| "-".to_string());

    let updated = if monitor.last_updated.as_millis() == 0 {
        "-".to_string()
    } else {
        format!("{} ago", format_age(monitor.last_updated.age(Timestamp::now())))
    };

    let mut lines = vec![
        field("Id", monitor.id.clone()),
        field("Kind", monitor.kind.label().to_string()),
        field("Updated", updated),
        field(
            "Statistics",
            if monitor.statistics.is_available() {
                format!(
                    "min {}  max {}  avg {}",
                    or_dash(monitor.statistics.min),
                    or_dash(monitor.statistics.max),
                    or_dash(monitor.statistics.average)
                )
            } else {
                "unavailable".to_string()
            },
        ),
    ];
    if let Some(ref formula) = monitor.formula {
        lines.push(field("Formula", formula.clone()));
    }
    if let Some(ref url) = monitor.source_url {
        lines.push(field("Link", url.clone()));
    }

    lines.push(Line::from(""));
    match row.config {
        Some(ref config) => {
            lines.push(field("Thresholds", config.describe_bounds()));
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<12}", "Severity"), dim),
                Span::styled(
                    config.severity.map(|s| s.as_str()).unwrap_or("unknown"),
                    app.theme.severity_style(config.severity),
                ),
            ]));
            if let Some(ref rule_id) = config.rule_id {
                lines.push(field("Rule", rule_id.clone()));
            }
        }
        None => lines.push(field("Thresholds", "no alert configured".to_string())),
    }

    lines.push(Line::from(""));
    lines.push(field(
        "Tags",
        if row.tags.is_empty() {
            "-".to_string()
        } else {
            row.tags.join(", ")
        },
    ));

    let fields_block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(fields_block), chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " a:alias t:tag p:pin  Esc:close ",
        dim,
    )]));
    frame.render_widget(footer, chunks[2]);
}
