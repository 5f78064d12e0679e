//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);

        let dialog_area = centered_popup(
            area,
            area.width.saturating_sub(8).min(64),
            area.height.saturating_sub(4),
        );

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        // Render scrollbar if content exceeds visible area
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Query Form");
    add_shortcut(&mut lines, "/ or i", "Focus the query input");
    add_shortcut(&mut lines, "Enter", "Submit the query");
    add_shortcut(&mut lines, "Esc / Tab", "Back to the results table");
    add_shortcut(&mut lines, "Ctrl+u", "Clear the query");
    add_shortcut(&mut lines, "Ctrl+f / f", "Select features");
    add_shortcut(&mut lines, "Ctrl+p / p", "Pick a query pattern");
    add_shortcut(&mut lines, "v", "Show or hide the form");

    add_section(&mut lines, "Results Table");
    add_shortcut(&mut lines, "j / ↓", "Next row");
    add_shortcut(&mut lines, "k / ↑", "Previous row");
    add_shortcut(&mut lines, "l / →", "Next column");
    add_shortcut(&mut lines, "h / ←", "Previous column");
    add_shortcut(&mut lines, "s", "Sort column: asc, desc, off");

    add_section(&mut lines, "Pagination");
    add_shortcut(&mut lines, "] / PgDn", "Next page");
    add_shortcut(&mut lines, "[ / PgUp", "Previous page");
    add_shortcut(&mut lines, "g / Home", "First page");
    add_shortcut(&mut lines, "G / End", "Last page");
    add_shortcut(&mut lines, "z", "Rows per page: 10, 20, 30");

    add_section(&mut lines, "Server");
    add_shortcut(&mut lines, "R", "Fetch features again");
    add_shortcut(&mut lines, "x", "Export results as CSV");
    add_shortcut(&mut lines, "H", "Query history");

    add_section(&mut lines, "Dialogs");
    add_shortcut(&mut lines, "Space/Enter", "Toggle feature / confirm");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit / Close dialog");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_lists_core_shortcuts() {
        let text: String = build_help_content()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Submit the query"));
        assert!(text.contains("Rows per page: 10, 20, 30"));
        assert!(text.contains("Export results as CSV"));
    }

    #[test]
    fn test_scroll_keys() {
        let mut dialog = HelpDialog::default();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        dialog.handle_key_event(key('j')).unwrap();
        dialog.handle_key_event(key('j')).unwrap();
        dialog.handle_key_event(key('k')).unwrap();
        assert_eq!(dialog.scroll_offset, 1);
        assert_eq!(
            dialog.handle_key_event(key('?')).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
