//! History dialog component
//!
//! Lists the queries submitted this session with details for the selected
//! entry. Confirming an entry loads it back into the form.

use crate::action::Action;
use crate::component::Component;
use crate::components::query_highlight::highlight_query;
use crate::model::history::QueryHistoryEntry;
use crate::model::{FeatureOption, QueryOutcome};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Query history dialog
#[derive(Default)]
pub struct HistoryDialog {
    pub selected_index: usize,
    list_state: ListState,
}

impl Component for HistoryDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ModalUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ModalDown),
            KeyCode::Esc | KeyCode::Char('H') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // This needs history data, so we use draw_with_history
        Ok(())
    }
}

impl HistoryDialog {
    pub fn draw_with_history(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        history: &[QueryHistoryEntry],
        features: &[FeatureOption],
    ) -> Result<()> {
        frame.render_widget(Clear, area);
        let background = Block::default().style(Style::default().bg(Color::Reset));
        frame.render_widget(background, area);

        let margin = 2;
        let overlay_area = Rect::new(
            area.x + margin,
            area.y + margin,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin * 2),
        );

        if history.is_empty() {
            let paragraph = Paragraph::new("No queries yet. Submit a query to see it here.")
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Query History ")
                        .title_style(
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD),
                        ),
                );
            frame.render_widget(paragraph, overlay_area);
            return Ok(());
        }

        let selected_idx = self.selected_index.min(history.len() - 1);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(overlay_area);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[0]);

        let items: Vec<ListItem> = history
            .iter()
            .map(|entry| {
                let color = match entry.outcome {
                    QueryOutcome::Rows(_) => Color::Green,
                    QueryOutcome::Failed => Color::Red,
                };
                let query = if entry.form.query.is_empty() {
                    "(empty query)".to_string()
                } else {
                    entry.form.query.clone()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", entry.status_icon()), Style::default().fg(color)),
                    Span::styled(
                        format!("{} ", entry.formatted_time()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(query),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" History ({}) ", history.len()))
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

        self.list_state.select(Some(selected_idx));
        frame.render_stateful_widget(list, content_chunks[0], &mut self.list_state);

        let detail = Paragraph::new(render_history_detail(&history[selected_idx], features))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Details ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(detail, content_chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                " Esc ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Close  "),
            Span::styled(
                " j/k ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Select  "),
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Load into form"),
        ]))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL));

        frame.render_widget(help, main_chunks[1]);

        Ok(())
    }
}

fn render_history_detail(
    entry: &QueryHistoryEntry,
    features: &[FeatureOption],
) -> Vec<Line<'static>> {
    let label = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Time: ", label),
            Span::raw(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Duration: ", label),
            Span::raw(entry.formatted_duration()),
        ]),
        Line::from(vec![
            Span::styled("Result: ", label),
            Span::styled(
                format!("{} {}", entry.status_icon(), entry.summary()),
                match entry.outcome {
                    QueryOutcome::Rows(_) => Style::default().fg(Color::Green),
                    QueryOutcome::Failed => Style::default().fg(Color::Red),
                },
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Query:", label)),
    ];

    lines.push(Line::from(highlight_query(&entry.form.query, features)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Features:", label)));
    if entry.form.selected_features.is_empty() {
        lines.push(Line::from(Span::styled(
            "none",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for feature in &entry.form.selected_features {
            lines.push(Line::from(format!("  {}", feature)));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QueryForm, QueryHistory};
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(history: &QueryHistory, selected_index: usize) -> String {
        let mut dialog = HistoryDialog {
            selected_index,
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| {
                dialog
                    .draw_with_history(frame, frame.area(), history.entries(), &[])
                    .unwrap();
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_enter_confirms() {
        let mut dialog = HistoryDialog::default();
        assert_eq!(
            dialog
                .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
                .unwrap(),
            Some(Action::ConfirmModal)
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(render(&QueryHistory::new(), 0).contains("No queries yet"));
    }

    #[test]
    fn test_render_entries_and_detail() {
        let mut history = QueryHistory::new();
        history.record(
            QueryForm {
                query: "clauses < 10".to_string(),
                selected_features: vec![],
            },
            QueryOutcome::Failed,
            0.2,
        );
        history.record(
            QueryForm {
                query: "variables > 5".to_string(),
                selected_features: vec!["family".to_string()],
            },
            QueryOutcome::Rows(3),
            0.5,
        );

        let content = render(&history, 0);
        assert!(content.contains("History (2)"));
        assert!(content.contains("3 rows"));
        assert!(content.contains("family"));

        // out of range selection clamps to the last entry
        let content = render(&history, 9);
        assert!(content.contains("failed"));
    }
}
