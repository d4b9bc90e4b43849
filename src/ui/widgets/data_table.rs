//! Bordered data table with sortable headers

use crate::constants::{COLUMN_PADDING, MAX_COLUMN_WIDTH};
use crate::table::TableState;
use crate::types::{FocusTarget, SortDirection};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table},
};

const COLUMN_SPACING: u16 = 1;
/// Room for the " ▲" sort indicator after a header
const SORT_INDICATOR_WIDTH: u16 = 2;

fn text_width(text: &str) -> u16 {
    Span::raw(text).width().min(u16::MAX as usize) as u16
}

/// Fit natural column widths into `available` columns.
///
/// Oversized tables shrink their widest column first. With `full_width`
/// the spare space goes to the last column.
pub fn fit_widths(natural: &[u16], available: u16, full_width: bool) -> Vec<u16> {
    let mut widths = natural.to_vec();
    if widths.is_empty() {
        return widths;
    }
    let spacing = COLUMN_SPACING * (widths.len() as u16 - 1);
    let budget = available.saturating_sub(spacing);

    let mut total: u16 = widths.iter().sum();
    while total > budget {
        let Some(widest) = widths
            .iter_mut()
            .filter(|w| **w > 1)
            .max_by_key(|w| **w)
        else {
            break;
        };
        *widest -= 1;
        total -= 1;
    }

    if full_width
        && total < budget
        && let Some(last) = widths.last_mut()
    {
        *last += budget - total;
    }
    widths
}

pub struct DataTableWidget<'a> {
    table: &'a TableState,
    focus: &'a FocusTarget,
    full_width: bool,
}

impl<'a> DataTableWidget<'a> {
    pub fn new(table: &'a TableState, focus: &'a FocusTarget, full_width: bool) -> Self {
        Self {
            table,
            focus,
            full_width,
        }
    }

    fn natural_widths(&self) -> Vec<u16> {
        self.table
            .columns()
            .iter()
            .map(|column| {
                let header = text_width(&column.header) + SORT_INDICATOR_WIDTH;
                let cells = self
                    .table
                    .view()
                    .iter()
                    .filter_map(|&idx| self.table.rows()[idx].get(&column.field))
                    .map(text_width)
                    .max()
                    .unwrap_or(0);
                header.max(cells).min(MAX_COLUMN_WIDTH) + COLUMN_PADDING * 2
            })
            .collect()
    }

    fn inner_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn column_widths(&self, area: Rect) -> Vec<u16> {
        fit_widths(
            &self.natural_widths(),
            Self::inner_area(area).width,
            self.full_width,
        )
    }

    /// Column whose header cell contains terminal column `x`
    pub fn column_at(&self, area: Rect, x: u16) -> Option<usize> {
        let inner = Self::inner_area(area);
        let mut start = inner.x;
        for (idx, width) in self.column_widths(area).into_iter().enumerate() {
            if x >= start && x < start + width {
                return Some(idx);
            }
            start += width + COLUMN_SPACING;
        }
        None
    }

    /// Screen row of the header
    pub fn header_y(area: Rect) -> u16 {
        Self::inner_area(area).y
    }

    /// Position in the visible rows for a click on screen row `y`
    pub fn row_at(&self, area: Rect, y: u16) -> Option<usize> {
        let inner = Self::inner_area(area);
        let body_y = inner.y + 1;
        if y < body_y || y >= inner.bottom() {
            return None;
        }
        let pos = self.table.scroll_offset + (y - body_y) as usize;
        (pos < self.table.visible_len()).then_some(pos)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        if self.table.columns().is_empty() {
            let empty = Paragraph::new("No data")
                .style(Style::default().fg(Color::Gray))
                .alignment(ratatui::layout::Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let sort = self.table.sort();
        let header_focused = *self.focus == FocusTarget::Header;
        let header_cells = self.table.columns().iter().enumerate().map(|(idx, column)| {
            let indicator = match sort {
                Some(s) if s.column == idx => match s.direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                },
                _ => "",
            };
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if header_focused && idx == self.table.header_cursor {
                style = style.fg(Color::Black).bg(Color::Cyan);
            }
            Cell::from(format!(" {}{}", column.header, indicator)).style(style)
        });
        let header = TableRow::new(header_cells).height(1);

        let body_rows = self.table.viewport_rows();
        let start = self.table.scroll_offset;
        let rows = self
            .table
            .view()
            .iter()
            .enumerate()
            .skip(start)
            .take(body_rows)
            .map(|(pos, &idx)| {
                let row = &self.table.rows()[idx];
                let cells = self
                    .table
                    .columns()
                    .iter()
                    .map(|c| Cell::from(format!(" {}", row.get(&c.field).unwrap_or(""))));
                let style = if pos == self.table.cursor && !header_focused {
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                TableRow::new(cells).style(style)
            });

        let widths = self
            .column_widths(area)
            .into_iter()
            .map(Constraint::Length);

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(COLUMN_SPACING)
            .flex(Flex::Start);

        frame.render_widget(table, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, SortKind};
    use crate::types::Row;

    fn create_test_table() -> TableState {
        let rows = vec![
            Row::from_pairs([("id", "1"), ("title", "Outage in region")]),
            Row::from_pairs([("id", "22"), ("title", "Billing")]),
        ];
        let columns = vec![
            Column::new("Id", "id").sortable(SortKind::Numeric),
            Column::new("Title", "title").sortable(SortKind::Natural),
        ];
        TableState::new(rows, columns)
    }

    #[test]
    fn test_fit_widths_full_width_pads_last() {
        assert_eq!(fit_widths(&[5, 10], 30, true), vec![5, 24]);
        assert_eq!(fit_widths(&[5, 10], 30, false), vec![5, 10]);
    }

    #[test]
    fn test_fit_widths_shrinks_widest() {
        assert_eq!(fit_widths(&[5, 20], 16, false), vec![5, 10]);
    }

    #[test]
    fn test_column_and_row_hit_testing() {
        let table = create_test_table();
        let focus = FocusTarget::Body;
        let widget = DataTableWidget::new(&table, &focus, false);
        let area = Rect::new(0, 3, 60, 10);

        // "Id" column: header 2 + indicator 2 + padding 2 = 6 wide, starting at x=1
        assert_eq!(widget.column_widths(area)[0], 6);
        assert_eq!(widget.column_at(area, 1), Some(0));
        assert_eq!(widget.column_at(area, 8), Some(1));
        assert_eq!(widget.column_at(area, 0), None);

        assert_eq!(DataTableWidget::header_y(area), 4);
        assert_eq!(widget.row_at(area, 5), Some(0));
        assert_eq!(widget.row_at(area, 6), Some(1));
        assert_eq!(widget.row_at(area, 7), None);
    }
}
