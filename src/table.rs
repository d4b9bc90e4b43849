//! Table model: column schema, sorting and cursor state
//!
//! The table never owns the filter logic. The caller computes the visible
//! row indices and hands them over with [`TableState::set_filtered`]; the
//! table orders them by the active sort and tracks the cursor.

use std::cmp::Ordering;

use crate::types::{Row, SortDirection, SortState};

/// How a column compares its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Byte-wise string order
    Text,
    /// Cells parsed as `f64`; cells that don't parse (or are NaN) sort as
    /// missing
    Numeric,
    /// Case-insensitive string order
    Natural,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub field: String,
    /// `None` makes the column unsortable
    pub sort: Option<SortKind>,
}

impl Column {
    pub fn new(header: impl Into<String>, field: impl Into<String>) -> Self {
        Column {
            header: header.into(),
            field: field.into(),
            sort: None,
        }
    }

    pub fn sortable(mut self, kind: SortKind) -> Self {
        self.sort = Some(kind);
        self
    }

    pub fn can_sort(&self) -> bool {
        self.sort.is_some()
    }
}

/// Numeric cell value. NaN has no place in an ordering, so it counts as
/// missing.
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Compare two present cells under `kind`. `None` means one side is
/// effectively missing (only possible for `Numeric`).
fn compare_cells(kind: SortKind, a: &str, b: &str) -> Option<Ordering> {
    match kind {
        SortKind::Text => Some(a.cmp(b)),
        SortKind::Natural => Some(
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
        ),
        SortKind::Numeric => {
            let x = parse_number(a)?;
            let y = parse_number(b)?;
            Some(x.total_cmp(&y))
        }
    }
}

fn sort_value<'a>(row: &'a Row, field: &str, kind: SortKind) -> Option<&'a str> {
    let cell = row.get(field)?;
    match kind {
        SortKind::Numeric if parse_number(cell).is_none() => None,
        _ => Some(cell),
    }
}

pub struct TableState {
    rows: Vec<Row>,
    columns: Vec<Column>,
    /// Indices into `rows` that passed the filter, in data order
    filtered: Vec<usize>,
    /// `filtered` ordered by the active sort
    view: Vec<usize>,
    sort: Option<SortState>,
    /// Position of the cursor within `view`
    pub cursor: usize,
    /// Column selected while the header has focus
    pub header_cursor: usize,
    pub scroll_offset: usize,
    viewport_rows: usize,
}

impl TableState {
    pub fn new(rows: Vec<Row>, columns: Vec<Column>) -> Self {
        let filtered: Vec<usize> = (0..rows.len()).collect();
        TableState {
            view: filtered.clone(),
            filtered,
            rows,
            columns,
            sort: None,
            cursor: 0,
            header_cursor: 0,
            scroll_offset: 0,
            viewport_rows: 1,
        }
    }

    /// Create a table sorted by `sort`. An unsortable or out-of-range column
    /// leaves the table unsorted.
    pub fn with_initial_sort(rows: Vec<Row>, columns: Vec<Column>, sort: SortState) -> Self {
        let mut table = TableState::new(rows, columns);
        table.set_sort(Some(sort));
        table
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Visible row indices in display order
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn set_filtered(&mut self, indices: Vec<usize>) {
        self.filtered = indices
            .into_iter()
            .filter(|&idx| idx < self.rows.len())
            .collect();
        self.rebuild_view();
        self.clamp_cursor();
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort.filter(|s| self.columns.get(s.column).is_some_and(Column::can_sort));
        self.rebuild_view();
    }

    /// Cycle the sort of `column`: none, ascending, descending, none.
    ///
    /// Switching to another column starts at ascending. Unsortable columns
    /// are ignored.
    ///
    /// # Returns
    /// The new sort state
    pub fn toggle_sort(&mut self, column: usize) -> Option<SortState> {
        if !self.columns.get(column).is_some_and(Column::can_sort) {
            tracing::debug!("Column {} is not sortable", column);
            return self.sort;
        }

        let next = match self.sort {
            Some(SortState {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => Some(SortState {
                column,
                direction: SortDirection::Descending,
            }),
            Some(SortState {
                column: current,
                direction: SortDirection::Descending,
            }) if current == column => None,
            _ => Some(SortState {
                column,
                direction: SortDirection::Ascending,
            }),
        };

        tracing::debug!("Sort changed: {:?} -> {:?}", self.sort, next);
        self.sort = next;
        self.rebuild_view();
        next
    }

    /// Header tooltip: what clicking `column` would do
    pub fn next_sort_label(&self, column: usize) -> Option<&'static str> {
        if !self.columns.get(column)?.can_sort() {
            return None;
        }
        match self.sort {
            Some(s) if s.column == column => match s.direction {
                SortDirection::Ascending => Some("Sort descending"),
                SortDirection::Descending => Some("Clear sort"),
            },
            _ => Some("Sort ascending"),
        }
    }

    fn rebuild_view(&mut self) {
        let mut view = self.filtered.clone();

        if let Some(sort) = self.sort
            && let Some(column) = self.columns.get(sort.column)
            && let Some(kind) = column.sort
        {
            let rows = &self.rows;
            let field = column.field.as_str();
            // Stable, so equal keys keep filter order
            view.sort_by(|&a, &b| {
                let va = sort_value(&rows[a], field, kind);
                let vb = sort_value(&rows[b], field, kind);
                match (va, vb) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(x), Some(y)) => {
                        let ord = compare_cells(kind, x, y).unwrap_or(Ordering::Equal);
                        match sort.direction {
                            SortDirection::Ascending => ord,
                            SortDirection::Descending => ord.reverse(),
                        }
                    }
                }
            });
        }

        self.view = view;
    }

    /// Index into `rows()` of the row under the cursor
    pub fn selected_index(&self) -> Option<usize> {
        self.view.get(self.cursor).copied()
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.selected_index().map(|idx| &self.rows[idx])
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_cursor_visible();
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    pub fn next(&mut self) {
        self.move_cursor_by(1);
    }

    pub fn previous(&mut self) {
        self.move_cursor_by(-1);
    }

    pub fn page_down(&mut self, page: usize) {
        self.move_cursor_by(page as isize);
    }

    pub fn page_up(&mut self, page: usize) {
        self.move_cursor_by(-(page as isize));
    }

    pub fn first(&mut self) {
        self.cursor = 0;
        self.ensure_cursor_visible();
    }

    pub fn last(&mut self) {
        self.cursor = self.view.len().saturating_sub(1);
        self.ensure_cursor_visible();
    }

    /// Put the cursor on the `pos`-th visible row (mouse click)
    pub fn select_visible(&mut self, pos: usize) -> bool {
        if pos < self.view.len() {
            self.cursor = pos;
            self.ensure_cursor_visible();
            true
        } else {
            false
        }
    }

    pub fn header_next(&mut self) {
        if self.header_cursor + 1 < self.columns.len() {
            self.header_cursor += 1;
        }
    }

    pub fn header_previous(&mut self) {
        self.header_cursor = self.header_cursor.saturating_sub(1);
    }

    fn move_cursor_by(&mut self, delta: isize) {
        if self.view.is_empty() {
            return;
        }
        let max = self.view.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(max);
        self.ensure_cursor_visible();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.view.len().saturating_sub(1));
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + self.viewport_rows {
            self.scroll_offset = self.cursor + 1 - self.viewport_rows;
        }
        let max_offset = self.view.len().saturating_sub(self.viewport_rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> TableState {
        let rows = vec![
            Row::from_pairs([("name", "bravo"), ("count", "10")]),
            Row::from_pairs([("name", "Alpha"), ("count", "2")]),
            Row::from_pairs([("name", "charlie")]),
            Row::from_pairs([("name", "delta"), ("count", "n/a")]),
            Row::from_pairs([("name", "echo"), ("count", "2")]),
        ];
        let columns = vec![
            Column::new("Name", "name").sortable(SortKind::Natural),
            Column::new("Count", "count").sortable(SortKind::Numeric),
            Column::new("Notes", "notes"),
        ];
        TableState::new(rows, columns)
    }

    #[test]
    fn test_sort_cycle() {
        let mut table = create_test_table();
        assert_eq!(table.next_sort_label(0), Some("Sort ascending"));

        let s = table.toggle_sort(0);
        assert_eq!(s.map(|s| s.direction), Some(SortDirection::Ascending));
        assert_eq!(table.next_sort_label(0), Some("Sort descending"));

        let s = table.toggle_sort(0);
        assert_eq!(s.map(|s| s.direction), Some(SortDirection::Descending));
        assert_eq!(table.next_sort_label(0), Some("Clear sort"));

        assert_eq!(table.toggle_sort(0), None);
        assert_eq!(table.view(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unsortable_column_is_ignored() {
        let mut table = create_test_table();
        assert_eq!(table.toggle_sort(2), None);
        assert_eq!(table.next_sort_label(2), None);
        assert_eq!(table.next_sort_label(9), None);
    }

    #[test]
    fn test_natural_sort() {
        let mut table = create_test_table();
        table.toggle_sort(0);
        assert_eq!(table.view(), &[1, 0, 2, 3, 4]);
    }

    #[test]
    fn test_numeric_sort_missing_last_both_directions() {
        let mut table = create_test_table();
        table.toggle_sort(1);
        // 2 (row 1), 2 (row 4) stable, 10, then missing/unparsable in filter order
        assert_eq!(table.view(), &[1, 4, 0, 2, 3]);

        table.toggle_sort(1);
        assert_eq!(table.view(), &[0, 1, 4, 2, 3]);
    }

    #[test]
    fn test_numeric_sort_treats_nan_as_missing() {
        let rows: Vec<Row> = (0..200)
            .map(|i| {
                let score = if i % 3 == 0 {
                    "NaN".to_string()
                } else {
                    (200 - i).to_string()
                };
                Row::from_pairs([("score", score.as_str())])
            })
            .collect();
        let columns = vec![Column::new("Score", "score").sortable(SortKind::Numeric)];
        let mut table = TableState::new(rows, columns);
        table.toggle_sort(0);

        let scores: Vec<&str> = table
            .view()
            .iter()
            .filter_map(|&idx| table.rows()[idx].get("score"))
            .collect();
        let numbers: Vec<f64> = scores
            .iter()
            .take_while(|s| **s != "NaN")
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(numbers.len(), 133);
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        assert!(scores[133..].iter().all(|s| *s == "NaN"));
    }

    #[test]
    fn test_sort_applies_to_filtered_rows() {
        let mut table = create_test_table();
        table.toggle_sort(0);
        table.set_filtered(vec![4, 0]);
        assert_eq!(table.view(), &[0, 4]);
    }

    #[test]
    fn test_initial_sort() {
        let table = TableState::with_initial_sort(
            create_test_table().rows().to_vec(),
            create_test_table().columns().to_vec(),
            SortState {
                column: 0,
                direction: SortDirection::Descending,
            },
        );
        assert_eq!(table.view()[0], 4);
    }

    #[test]
    fn test_cursor_clamped_after_filter() {
        let mut table = create_test_table();
        table.last();
        assert_eq!(table.selected_index(), Some(4));

        table.set_filtered(vec![1]);
        assert_eq!(table.cursor, 0);
        assert_eq!(table.selected_row().and_then(|r| r.get("name")), Some("Alpha"));

        table.set_filtered(vec![]);
        assert_eq!(table.selected_row(), None);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut table = create_test_table();
        table.set_viewport_rows(2);
        table.next();
        table.next();
        assert_eq!(table.scroll_offset, 1);
        table.first();
        assert_eq!(table.scroll_offset, 0);
        table.page_down(10);
        assert_eq!(table.cursor, 4);
        assert_eq!(table.scroll_offset, 3);
    }
}
