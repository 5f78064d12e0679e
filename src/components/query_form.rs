//! Query form component
//!
//! Shows the query input, the selected features and the active pattern.
//! While focused it turns typed characters into query edits.

use crate::action::Action;
use crate::component::Component;
use crate::components::query_highlight::highlight_query;
use crate::model::{FormState, QUERY_PATTERNS};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Form panel
#[derive(Default)]
pub struct QueryFormComponent {
    pub focused: bool,
}

impl QueryFormComponent {
    pub fn draw_with_form(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        form: &FormState,
        busy: bool,
    ) -> Result<()> {
        let mut query_spans = vec![Span::styled(
            "Query    ",
            Style::default().fg(Color::DarkGray),
        )];
        if form.query.is_empty() && !self.focused {
            query_spans.push(Span::styled(
                "press / to type a query, p for patterns",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            query_spans.extend(highlight_query(&form.query, &form.features));
        }
        if self.focused {
            query_spans.push(Span::styled(
                "_",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let features_line = if form.selected_features.is_empty() {
            Line::from(vec![
                Span::styled("Features ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("none selected ({} available)", form.features.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled("Features ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    form.selected_features.join(", "),
                    Style::default().fg(Color::Cyan),
                ),
            ])
        };

        let pattern_line = match form.selected_pattern.and_then(|i| QUERY_PATTERNS.get(i)) {
            Some(pattern) => Line::from(vec![
                Span::styled("Pattern  ", Style::default().fg(Color::DarkGray)),
                Span::styled(pattern.label, Style::default().fg(Color::Magenta)),
            ]),
            None => Line::from(Span::styled(
                "Pattern  -",
                Style::default().fg(Color::DarkGray),
            )),
        };

        let title = if busy {
            " Query [Running...] "
        } else {
            " Query "
        };
        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let paragraph = Paragraph::new(vec![
            Line::from(query_spans),
            Line::from(""),
            features_line,
            pattern_line,
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .border_style(Style::default().fg(border_color)),
        )
        .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
        Ok(())
    }
}

impl Component for QueryFormComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Enter => Some(Action::SubmitQuery),
            KeyCode::Esc | KeyCode::Tab => Some(Action::FocusTable),
            KeyCode::Backspace => Some(Action::QueryBackspace),
            KeyCode::Char('f') if ctrl => Some(Action::OpenFeatureSelector),
            KeyCode::Char('p') if ctrl => Some(Action::OpenPatternPicker),
            KeyCode::Char('u') if ctrl => Some(Action::ClearQuery),
            KeyCode::Char('c') if ctrl => Some(Action::OpenQuitDialog),
            KeyCode::Char(c) if !ctrl => Some(Action::QueryInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusForm => self.focused = true,
            Action::FocusTable => self.focused = false,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the form state, see draw_with_form
        Ok(())
    }
}
