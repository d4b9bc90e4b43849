//! Filter button, per-group badges and result count

use crate::filter::{badge_counts, badge_label};
use crate::selection::ActiveFilters;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const GAP: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Button,
    Badge(String),
    BadgeClose(String),
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Column offset from the start of the bar's content line
    pub x: u16,
    pub text: String,
}

impl Segment {
    pub fn width(&self) -> u16 {
        Span::raw(self.text.as_str()).width() as u16
    }
}

pub struct FilterBar<'a> {
    active: &'a ActiveFilters,
    results: usize,
    menu_open: bool,
}

impl<'a> FilterBar<'a> {
    pub fn new(active: &'a ActiveFilters, results: usize, menu_open: bool) -> Self {
        Self {
            active,
            results,
            menu_open,
        }
    }

    /// Bar content, left to right
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut x = 0;
        let mut push = |kind: SegmentKind, text: String, gap_after: u16| {
            let segment = Segment { kind, x, text };
            x += segment.width() + gap_after;
            segments.push(segment);
        };

        push(SegmentKind::Button, "[≡ Filter]".to_string(), GAP);

        for (group, count) in badge_counts(self.active.as_slice()) {
            push(
                SegmentKind::Badge(group.clone()),
                format!("[{} ", badge_label(&group, count)),
                0,
            );
            push(SegmentKind::BadgeClose(group), "x]".to_string(), GAP);
        }

        if !self.active.is_empty() {
            push(
                SegmentKind::Results,
                format!("Results: {}", self.results),
                0,
            );
        }

        segments
    }

    /// Line inside the bar's border that holds the content
    pub fn content_area(area: Rect) -> Rect {
        Rect {
            x: area.x.saturating_add(1).min(area.right()),
            y: area.y + area.height / 2,
            width: area.width.saturating_sub(2),
            height: area.height.min(1),
        }
    }

    /// Segment under the terminal cell (`column`, `row`)
    pub fn hit(&self, area: Rect, column: u16, row: u16) -> Option<SegmentKind> {
        let content = Self::content_area(area);
        if row != content.y || column < content.x || column >= content.right() {
            return None;
        }
        let offset = column - content.x;
        self.segments()
            .into_iter()
            .find(|s| offset >= s.x && offset < s.x + s.width())
            .map(|s| s.kind)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let button_style = if self.menu_open {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut spans = Vec::new();
        let mut cursor = 0;
        for segment in self.segments() {
            if segment.x > cursor {
                spans.push(Span::raw(" ".repeat((segment.x - cursor) as usize)));
            }
            cursor = segment.x + segment.width();
            let style = match segment.kind {
                SegmentKind::Button => button_style,
                SegmentKind::Badge(_) => Style::default().fg(Color::Cyan),
                SegmentKind::BadgeClose(_) => Style::default().fg(Color::Red),
                SegmentKind::Results => Style::default().fg(Color::Gray),
            };
            spans.push(Span::styled(segment.text, style));
        }

        let border = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(border, area);
        frame.render_widget(Paragraph::new(Line::from(spans)), Self::content_area(area));
    }
}
