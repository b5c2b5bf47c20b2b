use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // An open prompt captures all typing
    if app.prompt.is_some() {
        handle_prompt_input(app, key);
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through monitors while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('a') => app.start_alias_edit(),
            KeyCode::Char('t') => app.start_tag_edit(),
            KeyCode::Char('p') => app.toggle_pin(),
            _ => {}
        }
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Monitors),
        KeyCode::Char('2') => app.set_view(View::Alerts),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter detail overlay
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Refresh
        KeyCode::Char('r') => app.refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Sorting
        KeyCode::Char('s') => app.cycle_sort(),

        // Filter (start typing to filter)
        KeyCode::Char('/') => app.start_filter(),

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Annotations
        KeyCode::Char('a') => app.start_alias_edit(),
        KeyCode::Char('t') => app.start_tag_edit(),
        KeyCode::Char('T') => app.clear_tags(),
        KeyCode::Char('p') => app.toggle_pin(),

        // Export
        KeyCode::Char('e') => {
            let export_path = app.export_path.clone();
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle key input while the alias/tag prompt is open
fn handle_prompt_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_prompt();
        }
        KeyCode::Backspace => app.prompt_pop(),
        KeyCode::Char(c) => app.prompt_push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => {
            app.select_prev();
        }
        MouseEventKind::ScrollDown => {
            app.select_next();
        }

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows start after the header, tabs and table header
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                app.select_row(item_row);
            }

            // Tab clicks (the row just below the header)
            if clicked_row == 1 {
                // Approximate tab positions: Monitors (0-13), Alerts (14-25)
                if mouse.column < 14 {
                    app.set_view(View::Monitors);
                } else if mouse.column < 26 {
                    app.set_view(View::Alerts);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => {
            app.go_back();
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationStore;
    use crate::app::ViewOptions;
    use crate::source::DataSource;
    use crate::ui::Theme;
    use gaugewatch_types::{Dashboard, Monitor};
    use tempfile::TempDir;

    #[derive(Debug)]
    struct OnceSource(Option<Dashboard>);

    impl DataSource for OnceSource {
        fn poll(&mut self) -> Option<Dashboard> {
            self.0.take()
        }

        fn description(&self) -> &str {
            "once"
        }

        fn error(&self) -> Option<&str> {
            None
        }
    }

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let mut dashboard = Dashboard::new();
        dashboard.monitors = vec![Monitor::new("a"), Monitor::new("b")];
        let mut app = App::new(
            Box::new(OnceSource(Some(dashboard))),
            AnnotationStore::new(dir.path()),
            ViewOptions::default(),
            Theme::dark(),
        );
        app.reload_data();
        (dir, app)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_view_switching() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_view, View::Alerts);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Monitors);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_prompt_captures_keys() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.prompt.is_some());

        // 'q' is text while the prompt is open
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press(&mut app, KeyCode::Enter);

        assert!(app.prompt.is_none());
        assert_eq!(app.annotations.alias("a"), Some("q"));
    }

    #[test]
    fn test_filter_input() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter);
        assert!(!app.filter_active);
        assert_eq!(app.visible_rows().len(), 1);

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.visible_rows().len(), 2);
    }

    #[test]
    fn test_pin_key() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.pinned, vec!["b"]);
    }

    #[test]
    fn test_quit() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
