use super::centered_rect;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn heading(text: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

pub fn render_help_popup(f: &mut Frame) {
    let help_text = vec![
        heading("TABLE"),
        Line::from(""),
        Line::from("  j / ↓              Next row"),
        Line::from("  k / ↑              Previous row"),
        Line::from("  PgDn / PgUp        Page down / up"),
        Line::from("  g / Home           First row"),
        Line::from("  G / End            Last row"),
        Line::from("  Enter              Open row details"),
        Line::from("  Tab                Switch between rows and column headers"),
        Line::from("  h / l              Previous / next column (headers)"),
        Line::from("  Enter / s          Cycle sort of the selected column"),
        Line::from(""),
        heading("FILTERS"),
        Line::from(""),
        Line::from("  f                  Open / close the filter menu"),
        Line::from("  Enter / Space      Expand group or toggle checkbox"),
        Line::from("  h / ←              Collapse group"),
        Line::from("  x                  Clear all filters"),
        Line::from(""),
        heading("APPLICATION"),
        Line::from(""),
        Line::from("  R                  Reload data file"),
        Line::from("  ? / F1             Toggle this help"),
        Line::from("  q / Ctrl-c         Quit"),
        Line::from("  Esc                Close popup / menu"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let popup_height = (help_text.len() as u16).saturating_add(2);
    let popup_area = centered_rect(70, popup_height, f.area());
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}
