use crate::app::AppState;
use crate::error::Result;
use crate::types::{FocusTarget, UiMode};
use crate::ui::layout::screen_layout;
use crate::ui::widgets::data_table::DataTableWidget;
use crate::ui::widgets::filter_bar::{FilterBar, SegmentKind};
use crate::ui::widgets::filter_menu::FilterMenuWidget;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

pub struct InputHandler;

impl InputHandler {
    /// Handle keys shared by the table views
    /// Returns true if the key was handled, false otherwise
    fn handle_common_controls(app: &mut AppState, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
                true
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
                true
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                app.toggle_filter_menu();
                true
            }
            KeyCode::Char('x') => {
                app.clear_filters();
                true
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                app.show_help();
                true
            }
            KeyCode::Char('R') => {
                app.request_reload();
                true
            }
            KeyCode::Tab | KeyCode::BackTab => {
                app.cycle_focus();
                true
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, app: &mut AppState, key: KeyEvent) -> Result<()> {
        // Route input based on UI mode first
        match &app.ui_mode {
            UiMode::FilterMenu => Self::handle_filter_menu(app, key),
            UiMode::RowDetail(_) | UiMode::ErrorPopup(_) => Self::handle_popup(app, key),
            UiMode::Help => Self::handle_help(app, key),
            UiMode::Normal => match app.focus {
                FocusTarget::Header => Self::handle_header(app, key),
                FocusTarget::Body => Self::handle_body(app, key),
            },
        }
    }

    fn handle_filter_menu(app: &mut AppState, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('f') => {
                app.close_filter_menu();
            }
            KeyCode::Char('q') => {
                app.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                app.menu.next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.menu.previous();
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') | KeyCode::Right => {
                app.menu_activate();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                app.menu.collapse();
            }
            KeyCode::Char('x') => {
                app.clear_filters();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_popup(app: &mut AppState, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                app.close_popup();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_help(app: &mut AppState, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1) => {
                app.close_popup();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_header(app: &mut AppState, key: KeyEvent) -> Result<()> {
        if Self::handle_common_controls(app, key) {
            return Ok(());
        }

        match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                app.table.header_next();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                app.table.header_previous();
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => {
                app.toggle_sort_at_header();
            }
            KeyCode::Esc | KeyCode::Char('j') | KeyCode::Down => {
                app.focus = FocusTarget::Body;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_body(app: &mut AppState, key: KeyEvent) -> Result<()> {
        if Self::handle_common_controls(app, key) {
            return Ok(());
        }

        let page = app.config.page_size;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.table.next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.table.previous();
            }
            KeyCode::PageDown => {
                app.table.page_down(page);
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.table.page_down(page);
            }
            KeyCode::PageUp => {
                app.table.page_up(page);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.table.page_up(page);
            }
            KeyCode::Char('g') | KeyCode::Home => {
                app.table.first();
            }
            KeyCode::Char('G') | KeyCode::End => {
                app.table.last();
            }
            KeyCode::Enter => {
                app.activate_row();
            }
            KeyCode::Char('s') => {
                app.toggle_sort_at_header();
            }
            _ => {}
        }
        Ok(())
    }

    /// Route a mouse event by hit-testing the current screen layout
    pub fn handle_mouse(&mut self, app: &mut AppState, mouse: MouseEvent) -> Result<()> {
        let screen = Rect::new(0, 0, app.viewport.width, app.viewport.height);
        let areas = screen_layout(app, screen);
        let position = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::ScrollDown if areas.table.contains(position) => {
                app.table.next();
            }
            MouseEventKind::ScrollUp if areas.table.contains(position) => {
                app.table.previous();
            }
            MouseEventKind::Down(MouseButton::Left) => match &app.ui_mode {
                UiMode::RowDetail(_) | UiMode::ErrorPopup(_) | UiMode::Help => {
                    app.close_popup();
                }
                UiMode::FilterMenu => {
                    if let Some(menu_area) = areas.menu
                        && menu_area.contains(position)
                    {
                        let entry = FilterMenuWidget::new(&app.menu, &app.active_filters)
                            .entry_at(menu_area, mouse.row);
                        if let Some(pos) = entry
                            && app.menu.select(pos)
                        {
                            app.menu_activate();
                        }
                        return Ok(());
                    }

                    // A click outside the menu closes it and still reaches its target,
                    // except the filter button, which would reopen it
                    let bar = FilterBar::new(&app.active_filters, app.result_count(), true);
                    let on_button = bar.hit(areas.filter_bar, mouse.column, mouse.row)
                        == Some(SegmentKind::Button);
                    app.close_filter_menu();
                    if !on_button {
                        Self::handle_click(app, areas.filter_bar, areas.table, position);
                    }
                }
                UiMode::Normal => {
                    Self::handle_click(app, areas.filter_bar, areas.table, position);
                }
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_click(app: &mut AppState, filter_bar: Rect, table: Rect, position: Position) {
        if filter_bar.contains(position) {
            let bar = FilterBar::new(
                &app.active_filters,
                app.result_count(),
                app.ui_mode == UiMode::FilterMenu,
            );
            match bar.hit(filter_bar, position.x, position.y) {
                Some(SegmentKind::Button) => app.toggle_filter_menu(),
                Some(SegmentKind::BadgeClose(group)) => app.remove_badge(&group),
                _ => {}
            }
            return;
        }

        if !table.contains(position) {
            return;
        }

        let widget = DataTableWidget::new(&app.table, &app.focus, app.config.full_width);
        if position.y == DataTableWidget::header_y(table) {
            if let Some(column) = widget.column_at(table, position.x) {
                app.table.header_cursor = column;
                app.toggle_sort_at_header();
            }
        } else if let Some(pos) = widget.row_at(table, position.y) {
            app.focus = FocusTarget::Body;
            app.table.select_visible(pos);
            app.activate_row();
        }
    }
}
