//! Feature selector dialog component
//!
//! Multi-select list over the feature options fetched from the server.
//! Toggling keeps the dialog open so several features can be picked.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::FormState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Feature selector dialog
#[derive(Default)]
pub struct FeatureSelectorDialog {
    /// Cursor position in the option list
    pub selected_index: usize,
    list_state: ListState,
}

impl FeatureSelectorDialog {
    pub fn draw_with_form(&mut self, frame: &mut Frame, area: Rect, form: &FormState) -> Result<()> {
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let content_height = if form.features.is_empty() {
            6
        } else {
            form.features.len() as u16 + 2
        };
        let popup_height = (content_height + 6)
            .min(area.height.saturating_sub(4))
            .max(12);
        let popup_area = centered_popup(area, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Options
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let header = Paragraph::new(Line::from(Span::styled(
            format!(
                "{} of {} selected",
                form.selected_features.len(),
                form.features.len()
            ),
            Style::default().fg(Color::Cyan),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Select Features ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(header, chunks[0]);

        if form.features.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No features loaded",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "Press R to fetch them from the server",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[1]);
        } else {
            let selected = self.selected_index.min(form.features.len() - 1);
            let items: Vec<ListItem> = form
                .features
                .iter()
                .map(|option| {
                    let (marker, style) = if form.is_selected(&option.value) {
                        (
                            "● ",
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        ("○ ", Style::default().fg(Color::White))
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, style),
                        Span::styled(option.label.clone(), style),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL))
                .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

            self.list_state.select(Some(selected));
            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space/Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Toggle  "),
            Span::styled(" j/k ", Style::default().fg(Color::Yellow)),
            Span::raw("Move  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Done"),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

impl Component for FeatureSelectorDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ConfirmModal),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ModalUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ModalDown),
            KeyCode::Char('R') => Some(Action::FetchFeatures),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the form state, see draw_with_form
        Ok(())
    }
}
