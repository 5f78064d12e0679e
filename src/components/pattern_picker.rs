//! Query pattern picker dialog
//!
//! Lists the preset filter expressions; confirming one replaces the query.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::QueryPattern;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Pattern picker dialog
#[derive(Default)]
pub struct PatternPickerDialog {
    pub selected_index: usize,
    list_state: ListState,
}

impl PatternPickerDialog {
    pub fn draw_with_patterns(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        patterns: &[QueryPattern],
        active: Option<usize>,
    ) -> Result<()> {
        let popup_width = 64u16.min(area.width.saturating_sub(4));
        let popup_height = (patterns.len() as u16 + 5).min(area.height.saturating_sub(2));
        let popup_area = centered_popup(area, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let items: Vec<ListItem> = patterns
            .iter()
            .enumerate()
            .map(|(i, pattern)| {
                let marker = if active == Some(i) { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(
                        format!("{:24}", pattern.label),
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(pattern.value, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Query Patterns ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

        self.list_state
            .select(Some(self.selected_index.min(patterns.len().saturating_sub(1))));
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Use pattern  "),
            Span::styled(" j/k ", Style::default().fg(Color::Yellow)),
            Span::raw("Move  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

impl Component for PatternPickerDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ModalUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ModalDown),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the pattern list, see draw_with_patterns
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QUERY_PATTERNS;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_keys() {
        let mut dialog = PatternPickerDialog::default();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::ConfirmModal)
        );
        assert_eq!(
            dialog.handle_key_event(key(KeyCode::Char('j'))).unwrap(),
            Some(Action::ModalDown)
        );
    }

    #[test]
    fn test_render_lists_patterns() {
        let mut dialog = PatternPickerDialog::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                dialog
                    .draw_with_patterns(frame, frame.area(), QUERY_PATTERNS, Some(0))
                    .unwrap();
            })
            .unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Large instances"));
        assert!(content.contains("variables > 5000000"));
    }
}
