//! Colors for alert status and severity, in a light and a dark variant.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use gaugewatch_types::Severity;

use crate::data::MonitorRow;

/// Colors for the dashboard.
///
/// [`Theme::auto_detect()`] picks [`Theme::light()`] or [`Theme::dark()`]
/// from the terminal background.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Selection, pins, ticker and prompt borders.
    pub accent: Color,
    /// Values outside their bounds.
    pub breached: Color,
    /// Values inside their bounds.
    pub within_bounds: Color,
    /// Stale data and medium/low severities.
    pub stale: Color,
    pub border: Color,
    pub header: Style,
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    fn palette(accent: Color, muted: Color, selection: Color) -> Self {
        let accent_bold = Style::default().fg(accent).add_modifier(Modifier::BOLD);
        Self {
            accent,
            breached: Color::Red,
            within_bounds: Color::Green,
            stale: Color::Yellow,
            border: muted,
            header: accent_bold,
            selected: Style::default().bg(selection).add_modifier(Modifier::BOLD),
            tab_active: accent_bold,
            tab_inactive: Style::default().fg(muted),
            border_type: BorderType::Rounded,
        }
    }

    /// For dark terminal backgrounds.
    pub fn dark() -> Self {
        Self::palette(Color::Cyan, Color::Gray, Color::DarkGray)
    }

    /// For light terminal backgrounds.
    pub fn light() -> Self {
        Self::palette(Color::Blue, Color::DarkGray, Color::LightBlue)
    }

    /// Pick a theme from the terminal's background luminance.
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a row's alert status: breached, ok, or no config.
    pub fn status_style(&self, row: &MonitorRow) -> Style {
        if row.breached {
            Style::default().fg(self.breached).add_modifier(Modifier::BOLD)
        } else if row.active {
            Style::default().fg(self.within_bounds)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    }

    /// Style for a severity level.
    pub fn severity_style(&self, severity: Option<Severity>) -> Style {
        match severity {
            Some(Severity::Critical) => {
                Style::default().fg(self.breached).add_modifier(Modifier::BOLD)
            }
            Some(Severity::High) => Style::default().fg(self.breached),
            Some(Severity::Medium) | Some(Severity::Low) => Style::default().fg(self.stale),
            None => Style::default().add_modifier(Modifier::DIM),
        }
    }
}

/// Symbol for a row's alert status.
pub fn status_symbol(row: &MonitorRow) -> &'static str {
    if row.breached {
        "● ALERT"
    } else if row.active {
        "● ok"
    } else {
        "○"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaugewatch_types::{AlertThresholdConfig, Monitor};

    #[test]
    fn test_status_symbol() {
        let monitor = Monitor::builder("m").value(5.0).build();
        let idle = MonitorRow::new(monitor.clone(), None);
        let ok = MonitorRow::new(
            monitor.clone(),
            Some(AlertThresholdConfig::builder("m").upper(10.0).build()),
        );
        let breached = MonitorRow::new(
            monitor,
            Some(AlertThresholdConfig::builder("m").lower(10.0).build()),
        );
        assert_eq!(status_symbol(&idle), "○");
        assert_eq!(status_symbol(&ok), "● ok");
        assert_eq!(status_symbol(&breached), "● ALERT");
    }
}
