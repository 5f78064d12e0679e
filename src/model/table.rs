//! Results table state: sorting, pagination, cursor and busy flag

use super::result::{cell, ResultRow};
use std::ops::Range;

/// Sort direction for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Rows per page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Thirty,
}

impl PageSize {
    pub fn all() -> Vec<PageSize> {
        vec![PageSize::Ten, PageSize::Twenty, PageSize::Thirty]
    }

    pub fn rows(&self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Thirty => 30,
        }
    }

    pub fn next(&self) -> PageSize {
        match self {
            PageSize::Ten => PageSize::Twenty,
            PageSize::Twenty => PageSize::Thirty,
            PageSize::Thirty => PageSize::Ten,
        }
    }

    /// Parse a row count; only 10, 20 and 30 are valid
    pub fn from_rows(rows: usize) -> Option<PageSize> {
        Self::all().into_iter().find(|p| p.rows() == rows)
    }
}

/// Presentation state of the results table
#[derive(Debug, Clone, Default)]
pub struct ResultsTableState {
    pub row_count: usize,
    /// `None` means unsorted (server order)
    pub sort: Option<SortState>,
    /// Zero-based page index
    pub page: usize,
    pub page_size: PageSize,
    /// Set while a query is in flight
    pub busy: bool,
    /// Cursor row, relative to the current page
    pub selected_row: usize,
    /// Cursor column index into the field list
    pub selected_column: usize,
    /// First column drawn when the fields are wider than the panel
    pub column_offset: usize,
}

impl ResultsTableState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Number of pages, at least one
    pub fn page_count(&self) -> usize {
        self.row_count.div_ceil(self.page_size.rows()).max(1)
    }

    fn clamp(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
        let rows_on_page = self
            .row_count
            .saturating_sub(self.page * self.page_size.rows())
            .min(self.page_size.rows());
        self.selected_row = self.selected_row.min(rows_on_page.saturating_sub(1));
    }

    /// Apply a fresh result set: new row count, unsorted, page clamped
    pub fn reset_for_results(&mut self, row_count: usize, column_count: usize) {
        self.row_count = row_count;
        self.sort = None;
        self.selected_column = self.selected_column.min(column_count.saturating_sub(1));
        self.column_offset = self.column_offset.min(self.selected_column);
        self.clamp();
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.clamp();
    }

    pub fn cycle_page_size(&mut self) {
        self.set_page_size(self.page_size.next());
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.clamp();
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count() - 1;
        self.clamp();
    }

    pub fn next_row(&mut self) {
        self.selected_row += 1;
        self.clamp();
    }

    pub fn prev_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn next_column(&mut self, column_count: usize) {
        if self.selected_column + 1 < column_count {
            self.selected_column += 1;
        }
    }

    pub fn prev_column(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
        self.column_offset = self.column_offset.min(self.selected_column);
    }

    /// Columns that fit in `available` cells, shifting `column_offset` so
    /// the selected column is always among them. At least one column is
    /// returned while `widths` is non-empty.
    pub fn visible_columns(
        &mut self,
        widths: &[usize],
        available: usize,
        spacing: usize,
    ) -> Range<usize> {
        if widths.is_empty() {
            self.column_offset = 0;
            return 0..0;
        }
        let selected = self.selected_column.min(widths.len() - 1);
        self.column_offset = self.column_offset.min(selected);

        while fitting_end(widths, self.column_offset, available, spacing) <= selected {
            self.column_offset += 1;
        }
        // no blank space after the last column while earlier ones are hidden
        while self.column_offset > 0
            && fitting_end(widths, self.column_offset - 1, available, spacing) == widths.len()
        {
            self.column_offset -= 1;
        }
        self.column_offset..fitting_end(widths, self.column_offset, available, spacing)
    }

    /// Cycle sort on a column: unsorted → ascending → descending → unsorted
    pub fn cycle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some(SortState {
                column: current,
                direction,
            }) if current == column => match direction {
                SortDirection::Ascending => Some(SortState {
                    column: current,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortState {
                column: column.to_string(),
                direction: SortDirection::Ascending,
            }),
        };
    }

    /// Row indices of the full result set in display order
    pub fn sorted_indices(&self, rows: &[ResultRow]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        if let Some(ref sort) = self.sort {
            // stable sort keeps server order for equal keys
            indices.sort_by(|&a, &b| {
                let ord = cell(&rows[a], &sort.column).sort_cmp(cell(&rows[b], &sort.column));
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        indices
    }

    /// Row indices shown on the current page
    pub fn page_indices(&self, rows: &[ResultRow]) -> Vec<usize> {
        let size = self.page_size.rows();
        self.sorted_indices(rows)
            .into_iter()
            .skip(self.page * size)
            .take(size)
            .collect()
    }
}

/// End of the run of columns starting at `start` that fits in `available`
fn fitting_end(widths: &[usize], start: usize, available: usize, spacing: usize) -> usize {
    let mut used = widths[start];
    let mut end = start + 1;
    while end < widths.len() {
        let next = used + spacing + widths[end];
        if next > available {
            break;
        }
        used = next;
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::CellValue;

    fn rows(values: &[i64]) -> Vec<ResultRow> {
        values
            .iter()
            .map(|v| {
                let mut row = ResultRow::new();
                row.insert("n".to_string(), CellValue::Integer(*v));
                row
            })
            .collect()
    }

    #[test]
    fn test_page_count() {
        let mut table = ResultsTableState::new(PageSize::Ten);
        assert_eq!(table.page_count(), 1);
        table.reset_for_results(25, 1);
        assert_eq!(table.page_count(), 3);
        table.set_page_size(PageSize::Thirty);
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn test_page_size_cycle() {
        assert_eq!(PageSize::Ten.next(), PageSize::Twenty);
        assert_eq!(PageSize::Thirty.next(), PageSize::Ten);
        assert_eq!(PageSize::from_rows(20), Some(PageSize::Twenty));
        assert_eq!(PageSize::from_rows(15), None);
    }

    #[test]
    fn test_new_results_clamp_page_instead_of_resetting() {
        let mut table = ResultsTableState::new(PageSize::Ten);
        table.reset_for_results(50, 1);
        table.last_page();
        assert_eq!(table.page, 4);

        table.reset_for_results(45, 1);
        assert_eq!(table.page, 4);

        table.reset_for_results(12, 1);
        assert_eq!(table.page, 1);

        table.reset_for_results(0, 0);
        assert_eq!(table.page, 0);
        assert_eq!(table.selected_row, 0);
    }

    #[test]
    fn test_page_size_change_clamps_page() {
        let mut table = ResultsTableState::new(PageSize::Ten);
        table.reset_for_results(40, 1);
        table.last_page();
        table.set_page_size(PageSize::Thirty);
        assert_eq!(table.page, 1);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut table = ResultsTableState::new(PageSize::Ten);
        table.reset_for_results(15, 1);
        table.prev_page();
        assert_eq!(table.page, 0);
        table.next_page();
        table.next_page();
        assert_eq!(table.page, 1);
        table.first_page();
        assert_eq!(table.page, 0);
    }

    #[test]
    fn test_cursor_stays_on_partial_last_page() {
        let mut table = ResultsTableState::new(PageSize::Ten);
        table.reset_for_results(13, 1);
        for _ in 0..9 {
            table.next_row();
        }
        assert_eq!(table.selected_row, 9);
        table.next_page();
        assert_eq!(table.selected_row, 2);
    }

    #[test]
    fn test_cycle_sort() {
        let mut table = ResultsTableState::default();
        table.cycle_sort("n");
        assert_eq!(table.sort.as_ref().map(|s| s.direction), Some(SortDirection::Ascending));
        table.cycle_sort("n");
        assert_eq!(table.sort.as_ref().map(|s| s.direction), Some(SortDirection::Descending));
        table.cycle_sort("n");
        assert_eq!(table.sort, None);

        table.cycle_sort("n");
        table.cycle_sort("m");
        assert_eq!(
            table.sort,
            Some(SortState {
                column: "m".to_string(),
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn test_sorted_and_paged_indices() {
        let data = rows(&[5, 1, 4, 2, 3]);
        let mut table = ResultsTableState::new(PageSize::Ten);
        table.reset_for_results(data.len(), 1);

        assert_eq!(table.sorted_indices(&data), vec![0, 1, 2, 3, 4]);

        table.cycle_sort("n");
        assert_eq!(table.sorted_indices(&data), vec![1, 3, 4, 2, 0]);

        table.cycle_sort("n");
        assert_eq!(table.sorted_indices(&data), vec![0, 2, 4, 3, 1]);
    }

    #[test]
    fn test_page_indices() {
        let data = rows(&(0..25).collect::<Vec<_>>());
        let mut table = ResultsTableState::new(PageSize::Ten);
        table.reset_for_results(data.len(), 1);
        table.next_page();
        table.next_page();
        assert_eq!(table.page_indices(&data), (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_reset_clears_sort() {
        let mut table = ResultsTableState::default();
        table.cycle_sort("n");
        table.reset_for_results(3, 1);
        assert_eq!(table.sort, None);
    }

    #[test]
    fn test_visible_columns_follow_selection() {
        let widths = [10; 8];
        let mut table = ResultsTableState::default();

        // 10 + 2 + 10 + 2 + 10 = 34
        assert_eq!(table.visible_columns(&widths, 35, 2), 0..3);

        for _ in 0..5 {
            table.next_column(widths.len());
        }
        assert_eq!(table.visible_columns(&widths, 35, 2), 3..6);
        assert_eq!(table.column_offset, 3);

        table.next_column(widths.len());
        table.next_column(widths.len());
        table.next_column(widths.len());
        assert_eq!(table.selected_column, 7);
        assert_eq!(table.visible_columns(&widths, 35, 2), 5..8);

        // moving back inside the window keeps it still
        table.prev_column();
        assert_eq!(table.visible_columns(&widths, 35, 2), 5..8);

        for _ in 0..3 {
            table.prev_column();
        }
        assert_eq!(table.selected_column, 3);
        assert_eq!(table.visible_columns(&widths, 35, 2), 3..6);
    }

    #[test]
    fn test_visible_columns_narrow_panel() {
        let mut table = ResultsTableState {
            selected_column: 2,
            ..Default::default()
        };
        // wider than the panel still yields the selected column
        assert_eq!(table.visible_columns(&[40, 40, 40], 20, 2), 2..3);
        assert_eq!(table.visible_columns(&[], 20, 2), 0..0);
        assert_eq!(table.column_offset, 0);
    }

    #[test]
    fn test_fewer_columns_pull_offset_back() {
        let mut table = ResultsTableState {
            selected_column: 9,
            column_offset: 7,
            ..Default::default()
        };
        table.reset_for_results(3, 4);
        assert_eq!(table.selected_column, 3);
        assert_eq!(table.column_offset, 3);
        assert_eq!(table.visible_columns(&[5, 5, 5, 5], 80, 2), 0..4);
    }
}
