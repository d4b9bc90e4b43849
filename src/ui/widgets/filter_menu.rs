use crate::filter::display_name;
use crate::menu::{MenuEntry, MenuState};
use crate::selection::ActiveFilters;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

/// The checkbox dropdown
pub struct FilterMenuWidget<'a> {
    menu: &'a MenuState,
    active: &'a ActiveFilters,
}

impl<'a> FilterMenuWidget<'a> {
    pub fn new(menu: &'a MenuState, active: &'a ActiveFilters) -> Self {
        Self { menu, active }
    }

    /// Menu line under screen row `y`, if any
    pub fn entry_at(&self, area: Rect, y: u16) -> Option<usize> {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        if y < inner.y || y >= inner.bottom() {
            return None;
        }
        let pos = (y - inner.y) as usize + self.scroll_offset(inner.height as usize);
        (pos < self.menu.entries().len()).then_some(pos)
    }

    /// First line shown so that the cursor stays visible
    fn scroll_offset(&self, height: usize) -> usize {
        (self.menu.cursor + 1).saturating_sub(height.max(1))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Filters ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let entries = self.menu.entries();
        if entries.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "Nothing to filter",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let groups = self.menu.groups();
        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| match *entry {
                MenuEntry::Group(g) => {
                    let marker = if self.menu.is_expanded(g) { "▾" } else { "▸" };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{} ", marker)),
                        Span::styled(
                            display_name(&groups[g].field),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]))
                }
                MenuEntry::Item { group, item } => {
                    let checked = self.menu.is_checked(*entry, self.active);
                    let checkbox = if checked { "[x]" } else { "[ ]" };
                    let style = if checked {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw("    "),
                        Span::styled(checkbox, style),
                        Span::raw(" "),
                        Span::raw(groups[group].values[item].clone()),
                    ]))
                }
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Rgb(40, 60, 80)));

        let mut list_state = ListState::default();
        list_state.select(Some(self.menu.cursor));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}
