//! Results table component
//!
//! Renders the current page of result rows with a sort indicator on the
//! sorted column and a cursor on the selected column and row. When the
//! columns are wider than the panel only a window of them is drawn, kept
//! around the selected column.

use crate::action::Action;
use crate::component::Component;
use crate::model::{ResultRow, SortDirection, ViewModel};
use crate::model::result::cell;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may get, in terminal cells
const MAX_COLUMN_WIDTH: usize = 40;

const COLUMN_SPACING: usize = 2;
const HIGHLIGHT_SYMBOL: &str = "▶ ";

/// Truncate to a display width, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Column widths from header and visible cells, capped
pub fn column_widths(fields: &[String], rows: &[&ResultRow]) -> Vec<usize> {
    fields
        .iter()
        .map(|field| {
            // room for the sort indicator
            let header = field.width() + 2;
            rows.iter()
                .map(|row| cell(row, field).to_string().width())
                .fold(header, usize::max)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// Results table panel
#[derive(Default)]
pub struct ResultsTableComponent {
    pub focused: bool,
    table_state: TableState,
}

impl ResultsTableComponent {
    pub fn draw_with_view_model(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        vm: &mut ViewModel,
    ) -> Result<()> {
        // borders and the row highlight symbol
        let available = (area.width as usize).saturating_sub(2 + HIGHLIGHT_SYMBOL.width());
        let mut widths = column_widths(&vm.fields, &vm.page_rows());
        let visible = vm.table.visible_columns(&widths, available, COLUMN_SPACING);
        for width in &mut widths[visible.clone()] {
            *width = (*width).min(available);
        }
        let table = &vm.table;

        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let mut title = format!(" Results ({} rows) ", table.row_count);
        if table.busy {
            title.push_str("[Loading...] ");
        }

        let mut footer = Line::from(vec![
            Span::styled(
                format!(" Page {}/{} ", table.page + 1, table.page_count()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("· {} per page ", table.page_size.rows()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        if visible.len() < vm.fields.len() {
            footer.push_span(Span::styled(
                format!(
                    "· cols {}-{} of {} ",
                    visible.start + 1,
                    visible.end,
                    vm.fields.len()
                ),
                Style::default().fg(Color::Magenta),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .title_bottom(footer)
            .border_style(Style::default().fg(border_color));

        if vm.fields.is_empty() {
            let message = if table.busy {
                "Running query..."
            } else if vm.results.is_empty() {
                "No results. Enter a query and press Enter to submit."
            } else {
                "Result rows have no columns"
            };
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(message, Style::default().fg(Color::DarkGray))),
            ])
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, area);
            return Ok(());
        }

        let page_rows = vm.page_rows();
        let fields = &vm.fields[visible.clone()];
        let widths = &widths[visible.clone()];
        let selected_column = table.selected_column.checked_sub(visible.start);

        let header_cells = fields.iter().enumerate().map(|(i, field)| {
            let indicator = match table.sort.as_ref() {
                Some(sort) if sort.column == *field => match sort.direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                },
                _ => "",
            };
            let mut style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            if self.focused && Some(i) == selected_column {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Cell::from(format!(
                "{}{}",
                truncate_to_width(field, widths[i].saturating_sub(indicator.width())),
                indicator
            ))
            .style(style)
        });

        let rows = page_rows.iter().map(|row| {
            Row::new(fields.iter().enumerate().map(|(i, field)| {
                let text = truncate_to_width(&cell(row, field).to_string(), widths[i]);
                let style = if Some(i) == selected_column && self.focused {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Cell::from(text).style(style)
            }))
        });

        let constraints = widths.iter().map(|w| Constraint::Length(*w as u16));

        let widget = Table::new(rows, constraints)
            .header(Row::new(header_cells).bottom_margin(1))
            .block(block)
            .column_spacing(COLUMN_SPACING as u16)
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol(HIGHLIGHT_SYMBOL);

        self.table_state.select(if self.focused && !page_rows.is_empty() {
            Some(table.selected_row)
        } else {
            None
        });

        frame.render_stateful_widget(widget, area, &mut self.table_state);
        Ok(())
    }
}

impl Component for ResultsTableComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Cursor
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextColumn),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevColumn),

            // Sorting and pagination
            KeyCode::Char('s') => Some(Action::CycleSort),
            KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
            KeyCode::Char('z') => Some(Action::CyclePageSize),

            // Form
            KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Tab => Some(Action::FocusForm),
            KeyCode::Enter => Some(Action::SubmitQuery),
            KeyCode::Char('v') => Some(Action::ToggleForm),
            KeyCode::Char('f') => Some(Action::OpenFeatureSelector),
            KeyCode::Char('p') => Some(Action::OpenPatternPicker),
            KeyCode::Char('R') => Some(Action::FetchFeatures),

            // Other
            KeyCode::Char('x') => Some(Action::ExportCsv),
            KeyCode::Char('H') => Some(Action::OpenHistory),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::OpenQuitDialog)
            }
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusTable => self.focused = true,
            Action::FocusForm => self.focused = false,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the view-model, see draw_with_view_model
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::parse_rows;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_column_widths() {
        let rows = parse_rows(r#"[{"a": 123456, "hash": "x"}]"#).unwrap();
        let refs: Vec<_> = rows.iter().collect();
        let widths = column_widths(&["a".to_string(), "hash".to_string()], &refs);
        assert_eq!(widths, vec![6, 6]);

        let long = format!(r#"[{{"a": "{}"}}]"#, "x".repeat(100));
        let rows = parse_rows(&long).unwrap();
        let refs: Vec<_> = rows.iter().collect();
        assert_eq!(column_widths(&["a".to_string()], &refs), vec![MAX_COLUMN_WIDTH]);
    }

    #[test]
    fn test_key_bindings() {
        let mut table = ResultsTableComponent::default();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(table.handle_key_event(key('s')).unwrap(), Some(Action::CycleSort));
        assert_eq!(table.handle_key_event(key('z')).unwrap(), Some(Action::CyclePageSize));
        assert_eq!(table.handle_key_event(key(']')).unwrap(), Some(Action::NextPage));
    }

    #[test]
    fn test_render_rows_and_sort_indicator() {
        let mut vm = ViewModel::default();
        vm.begin_submit();
        vm.apply_results(parse_rows(
            r#"[{"variables": 6000000, "clauses": 10}, {"variables": 42, "clauses": 7}]"#,
        ));
        vm.table.cycle_sort("variables");

        let mut component = ResultsTableComponent {
            focused: true,
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| {
                component
                    .draw_with_view_model(frame, frame.area(), &mut vm)
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
        assert!(content.contains("Results (2 rows)"));
        assert!(content.contains("variables ▲"));
        assert!(content.contains("6000000"));
        assert!(content.contains("Page 1/1"));
    }

    #[test]
    fn test_render_empty() {
        let mut vm = ViewModel::default();
        let mut component = ResultsTableComponent::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal
            .draw(|frame| {
                component
                    .draw_with_view_model(frame, frame.area(), &mut vm)
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
        assert!(content.contains("No results"));
    }

    #[test]
    fn test_wide_results_scroll_to_selected_column() {
        let row: Vec<String> = (0..12)
            .map(|i| format!(r#""feature_number_{:02}": {}"#, i, i))
            .collect();
        let mut vm = ViewModel::default();
        vm.begin_submit();
        vm.apply_results(parse_rows(&format!("[{{{}}}]", row.join(", "))));
        vm.table.selected_column = 11;
        vm.table.cycle_sort("feature_number_11");

        let mut component = ResultsTableComponent {
            focused: true,
            ..Default::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|frame| {
                component
                    .draw_with_view_model(frame, frame.area(), &mut vm)
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
        assert!(content.contains("feature_number_11 ▲"));
        assert!(!content.contains("feature_number_00"));
        assert!(content.contains("cols 10-12 of 12"));
        assert_eq!(vm.table.column_offset, 9);
    }
}
