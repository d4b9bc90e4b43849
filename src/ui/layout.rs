use crate::app::AppState;
use crate::constants::{FILTER_BAR_HEIGHT, FILTER_MENU_WIDTH};
use crate::types::{FocusTarget, LoadingState, UiMode};
use crate::ui::widgets::data_table::DataTableWidget;
use crate::ui::widgets::filter_bar::FilterBar;
use crate::ui::widgets::filter_menu::FilterMenuWidget;
use crate::ui::widgets::loading::LoadingWidget;
use crate::ui::widgets::popups::{error, help, row_detail};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

/// Screen regions shared by rendering and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub filter_bar: Rect,
    pub table: Rect,
    pub statusbar: Rect,
    /// Dropdown below the filter button, when open
    pub menu: Option<Rect>,
}

/// Split `area` into regions. `menu_lines` is the number of menu entries
/// when the filter menu is open.
pub fn compute(area: Rect, menu_lines: Option<usize>) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FILTER_BAR_HEIGHT), // Filter bar
            Constraint::Min(0),                    // Table
            Constraint::Length(1),                 // Statusbar
        ])
        .split(area);

    let menu = menu_lines.map(|lines| {
        let below_bar = chunks[0].y + chunks[0].height;
        let max_height = area.bottom().saturating_sub(below_bar);
        Rect {
            x: chunks[0].x,
            y: below_bar,
            width: FILTER_MENU_WIDTH.min(area.width),
            height: (lines as u16).saturating_add(2).min(max_height),
        }
    });

    ScreenLayout {
        filter_bar: chunks[0],
        table: chunks[1],
        statusbar: chunks[2],
        menu,
    }
}

/// Rows available for data in the table area (borders and header excluded)
pub fn table_body_rows(table: Rect) -> u16 {
    table.height.saturating_sub(3)
}

pub fn screen_layout(app: &AppState, area: Rect) -> ScreenLayout {
    let menu_lines = match app.ui_mode {
        UiMode::FilterMenu => Some(app.menu.entries().len().max(1)),
        _ => None,
    };
    compute(area, menu_lines)
}

pub fn render(f: &mut Frame, app: &AppState) {
    let areas = screen_layout(app, f.area());

    FilterBar::new(&app.active_filters, app.result_count(), app.ui_mode == UiMode::FilterMenu)
        .render(f, areas.filter_bar);

    if let LoadingState::LoadingData { file_path, started } = &app.loading_state {
        LoadingWidget::new(format!("Loading {}", file_path), *started).render(f, areas.table);
    } else {
        DataTableWidget::new(&app.table, &app.focus, app.config.full_width).render(f, areas.table);
    }

    render_statusbar(f, app, areas.statusbar);

    if let Some(menu_area) = areas.menu {
        FilterMenuWidget::new(&app.menu, &app.active_filters).render(f, menu_area);
    }

    match &app.ui_mode {
        UiMode::RowDetail(idx) => {
            if let Some(row) = app.table.rows().get(*idx) {
                row_detail::render_row_detail_popup(f, row, app.table.columns());
            }
        }
        UiMode::Help => help::render_help_popup(f),
        UiMode::ErrorPopup(message) => error::render_error_popup(f, message),
        UiMode::Normal | UiMode::FilterMenu => {}
    }
}

fn render_statusbar(f: &mut Frame, app: &AppState, area: Rect) {
    let total = app.table.rows().len();
    let status_text = if total == 0 {
        "No rows loaded | ? help".to_string()
    } else {
        match app.focus {
            FocusTarget::Header => {
                let column = app.table.header_cursor;
                let header = app
                    .table
                    .columns()
                    .get(column)
                    .map(|c| c.header.as_str())
                    .unwrap_or("");
                let hint = app
                    .table
                    .next_sort_label(column)
                    .unwrap_or("Not sortable");
                format!("Column {} | Enter: {} | Tab: rows | ? help", header, hint)
            }
            FocusTarget::Body => {
                let shown = app.table.visible_len();
                let position = if shown == 0 { 0 } else { app.table.cursor + 1 };
                format!(
                    "Row {}/{} ({} total) | f: filter | Tab: columns | ? help",
                    position, shown, total
                )
            }
        }
    };

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_regions() {
        let layout = compute(Rect::new(0, 0, 80, 24), None);
        assert_eq!(layout.filter_bar, Rect::new(0, 0, 80, 3));
        assert_eq!(layout.table, Rect::new(0, 3, 80, 20));
        assert_eq!(layout.statusbar, Rect::new(0, 23, 80, 1));
        assert_eq!(layout.menu, None);
        assert_eq!(table_body_rows(layout.table), 17);
    }

    #[test]
    fn test_menu_sits_below_filter_bar() {
        let layout = compute(Rect::new(0, 0, 80, 24), Some(5));
        assert_eq!(layout.menu, Some(Rect::new(0, 3, FILTER_MENU_WIDTH, 7)));
    }

    #[test]
    fn test_menu_height_is_capped() {
        let layout = compute(Rect::new(0, 0, 20, 10), Some(50));
        let menu = layout.menu.unwrap();
        assert_eq!(menu.bottom(), 10);
        assert_eq!(menu.width, 20);
    }
}
