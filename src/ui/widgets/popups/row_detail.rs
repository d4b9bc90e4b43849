//! Detail view for an activated row

use super::centered_rect;
use crate::table::Column;
use crate::types::Row;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Field lines for `row`: schema columns first, then any remaining fields
pub fn detail_lines<'a>(row: &'a Row, columns: &'a [Column]) -> Vec<(&'a str, &'a str)> {
    let mut lines: Vec<(&str, &str)> = columns
        .iter()
        .map(|c| (c.header.as_str(), row.get(&c.field).unwrap_or("-")))
        .collect();
    lines.extend(
        row.iter()
            .filter(|(key, _)| !columns.iter().any(|c| c.field == *key)),
    );
    lines
}

pub fn render_row_detail_popup(f: &mut Frame, row: &Row, columns: &[Column]) {
    let fields = detail_lines(row, columns);
    let label_width = fields
        .iter()
        .map(|(label, _)| Span::raw(*label).width())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = fields
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", label, width = label_width),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*value),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc or Enter to close",
        Style::default().fg(Color::Gray),
    )));

    let popup_area = centered_rect(60, (lines.len() as u16).saturating_add(2), f.area());
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Row ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup_area);
}
