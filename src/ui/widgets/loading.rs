//! Loading spinner shown while a data file is parsed

use crate::ui::widgets::popups::centered_rect;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::time::Instant;

/// Spinner animation styles
#[derive(Debug, Clone, Copy)]
pub enum SpinnerStyle {
    /// Braille dots: ⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏
    Dots,
}

impl SpinnerStyle {
    fn frames(&self) -> &'static [&'static str] {
        match self {
            Self::Dots => &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
        }
    }

    fn frame_at(&self, elapsed_ms: u128) -> &'static str {
        let frames = self.frames();
        frames[(elapsed_ms / 80) as usize % frames.len()]
    }
}

pub struct LoadingWidget {
    style: SpinnerStyle,
    message: String,
    start_time: Instant,
}

impl LoadingWidget {
    /// `start_time` is when loading began, so the animation advances
    /// across redraws
    pub fn new(message: impl Into<String>, start_time: Instant) -> Self {
        Self {
            style: SpinnerStyle::Dots,
            message: message.into(),
            start_time,
        }
    }

    fn spinner_frame(&self) -> &'static str {
        self.style.frame_at(self.start_time.elapsed().as_millis())
    }

    /// Render the spinner centered in `area`
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let spinner_char = self.spinner_frame();

        let line = Line::from(vec![
            Span::styled(
                spinner_char,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(&self.message, Style::default().fg(Color::White)),
        ]);

        let paragraph = Paragraph::new(line).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Loading ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        f.render_widget(paragraph, centered_rect(60, 3, area));
    }
}
