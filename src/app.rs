use crate::filter::{apply_filters, menu_groups};
use crate::menu::MenuState;
use crate::persistence::{PersistenceManager, ViewState};
use crate::selection::ActiveFilters;
use crate::table::{Column, TableState};
use crate::types::{
    Config, FocusTarget, LoadingState, Row, SortDirection, SortState, UiMode, Viewport,
};
use crate::ui::layout;

pub struct AppState {
    pub table: TableState,
    pub active_filters: ActiveFilters,
    pub menu: MenuState,
    pub config: Config,
    pub should_quit: bool,

    // UI Mode
    pub ui_mode: UiMode,
    pub focus: FocusTarget,
    pub viewport: Viewport,
    pub loading_state: LoadingState,

    // Sort requested on the command line, resolved once columns are known
    pub cli_sort: Option<(String, SortDirection)>,

    // Data source
    pub data_path: Option<String>,
    pub reload_requested: bool,

    // Persistence
    persistence: Option<PersistenceManager>,
}

impl AppState {
    pub fn new(config: Config, persistence: Option<PersistenceManager>) -> Self {
        AppState {
            table: TableState::new(Vec::new(), Vec::new()),
            active_filters: ActiveFilters::new(),
            menu: MenuState::default(),
            config,
            should_quit: false,
            ui_mode: UiMode::Normal,
            focus: FocusTarget::Body,
            viewport: Viewport {
                width: 80,
                height: 24,
            },
            loading_state: LoadingState::Idle,
            cli_sort: None,
            data_path: None,
            reload_requested: false,
            persistence,
        }
    }

    /// Install a new data set, rebuilding the filter menu and restoring any
    /// saved view state for `data_path`.
    pub fn load_data(&mut self, rows: Vec<Row>, columns: Vec<Column>, data_path: Option<String>) {
        let groups = menu_groups(&rows, &self.config.filter_fields);
        tracing::info!(
            "Loading {} rows with {} columns ({} filter groups)",
            rows.len(),
            columns.len(),
            groups.len()
        );

        let saved = self.load_view_state(data_path.as_deref());
        let mut sort = saved.as_ref().and_then(|s| s.sort);

        self.active_filters = match saved {
            Some(state) => {
                // Only keep selections the current menu can still show
                let restorable = state
                    .active_filters
                    .into_iter()
                    .filter(|f| {
                        groups
                            .iter()
                            .any(|g| g.field == f.group && g.values.contains(&f.value))
                    })
                    .collect();
                ActiveFilters::from_saved(restorable)
            }
            None => ActiveFilters::new(),
        };

        if let Some((name, direction)) = &self.cli_sort {
            match resolve_column(&columns, name) {
                Some(column) => {
                    sort = Some(SortState {
                        column,
                        direction: *direction,
                    })
                }
                None => tracing::warn!("Sort column '{}' not found", name),
            }
        }

        self.menu = MenuState::new(groups);
        self.table = TableState::new(rows, columns);
        self.table.set_sort(sort);
        self.data_path = data_path;
        self.loading_state = LoadingState::Idle;
        self.refresh_filters();
        self.update_viewport_size(self.viewport.width, self.viewport.height);
    }

    fn load_view_state(&self, data_path: Option<&str>) -> Option<ViewState> {
        if !self.config.remember_filters {
            return None;
        }
        let (persistence, path) = (self.persistence.as_ref()?, data_path?);
        match persistence.load_view_state(path) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Failed to load view state: {}", e);
                None
            }
        }
    }

    /// Recompute the visible rows from the active filters
    pub fn refresh_filters(&mut self) {
        let visible = apply_filters(self.table.rows(), self.active_filters.as_slice());
        self.table.set_filtered(visible);
    }

    pub fn result_count(&self) -> usize {
        self.table.visible_len()
    }

    pub fn update_viewport_size(&mut self, width: u16, height: u16) {
        self.viewport.width = width;
        self.viewport.height = height;
        let areas = layout::compute(
            ratatui::layout::Rect::new(0, 0, width, height),
            None,
        );
        self.table
            .set_viewport_rows(layout::table_body_rows(areas.table) as usize);
    }

    // Filter menu
    pub fn open_filter_menu(&mut self) {
        tracing::debug!("Filter menu opened");
        self.ui_mode = UiMode::FilterMenu;
    }

    pub fn close_filter_menu(&mut self) {
        if self.ui_mode == UiMode::FilterMenu {
            tracing::debug!("Filter menu closed");
            self.ui_mode = UiMode::Normal;
        }
    }

    pub fn toggle_filter_menu(&mut self) {
        if self.ui_mode == UiMode::FilterMenu {
            self.close_filter_menu();
        } else {
            self.open_filter_menu();
        }
    }

    /// Expand the group or toggle the checkbox under the menu cursor
    pub fn menu_activate(&mut self) {
        if self.menu.activate(&mut self.active_filters) {
            self.refresh_filters();
        }
    }

    /// Badge close button: drop every selection of `group`
    pub fn remove_badge(&mut self, group: &str) {
        if self.active_filters.clear_group(group) > 0 {
            self.refresh_filters();
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.active_filters.is_empty() {
            tracing::debug!("Clearing all {} filters", self.active_filters.len());
            self.active_filters.clear();
            self.refresh_filters();
        }
    }

    // Table
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusTarget::Body => FocusTarget::Header,
            FocusTarget::Header => FocusTarget::Body,
        };
    }

    pub fn toggle_sort_at_header(&mut self) {
        let column = self.table.header_cursor;
        self.table.toggle_sort(column);
    }

    /// Open the detail popup for the row under the cursor
    ///
    /// # Returns
    /// Index of the activated row in the data set
    pub fn activate_row(&mut self) -> Option<usize> {
        let idx = self.table.selected_index()?;
        tracing::info!("Row {} activated", idx);
        self.ui_mode = UiMode::RowDetail(idx);
        Some(idx)
    }

    pub fn show_help(&mut self) {
        self.ui_mode = UiMode::Help;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui_mode = UiMode::ErrorPopup(message.into());
    }

    pub fn close_popup(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    pub fn request_reload(&mut self) {
        if self.data_path.is_some() {
            self.save_state();
            self.reload_requested = true;
        }
    }

    /// Persist filters and sort for the current data file
    pub fn save_state(&mut self) {
        if !self.config.remember_filters {
            return;
        }
        let (Some(persistence), Some(path)) = (&self.persistence, &self.data_path) else {
            return;
        };

        let state = ViewState {
            active_filters: self.active_filters.to_vec(),
            sort: self.table.sort(),
            last_opened: chrono::Utc::now(),
        };
        if let Err(e) = persistence.save_view_state(path, state) {
            tracing::error!("Failed to save view state: {}", e);
        }
    }
}

/// Find a column by field name or header, case-insensitively
fn resolve_column(columns: &[Column], name: &str) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.field.eq_ignore_ascii_case(name) || c.header.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortKind;
    use tempfile::TempDir;

    fn create_test_rows() -> Vec<Row> {
        vec![
            Row::from_pairs([("title", "Outage"), ("importance", "high"), ("customer", "Acme")]),
            Row::from_pairs([("title", "Billing"), ("importance", "low"), ("customer", "Globex")]),
            Row::from_pairs([("title", "Login"), ("importance", "high"), ("customer", "Globex")]),
        ]
    }

    fn create_test_columns() -> Vec<Column> {
        vec![
            Column::new("Title", "title").sortable(SortKind::Natural),
            Column::new("Importance", "importance").sortable(SortKind::Text),
            Column::new("Customer", "customer"),
        ]
    }

    fn create_test_app() -> AppState {
        let mut app = AppState::new(Config::default(), None);
        app.load_data(create_test_rows(), create_test_columns(), None);
        app
    }

    #[test]
    fn test_load_builds_menu_from_filter_fields() {
        let app = create_test_app();
        let fields: Vec<&str> = app.menu.groups().iter().map(|g| g.field.as_str()).collect();
        assert_eq!(fields, vec!["importance", "customer"]);
        assert_eq!(app.result_count(), 3);
    }

    #[test]
    fn test_menu_toggle_filters_table() {
        let mut app = create_test_app();
        app.open_filter_menu();
        // Expand "importance", move to "low" and check it
        app.menu_activate();
        app.menu.next();
        app.menu.next();
        app.menu_activate();

        assert_eq!(app.result_count(), 1);
        assert_eq!(app.table.selected_row().and_then(|r| r.get("title")), Some("Billing"));
    }

    #[test]
    fn test_remove_badge_restores_rows() {
        let mut app = create_test_app();
        app.active_filters.toggle("customer", "Globex");
        app.active_filters.toggle("importance", "high");
        app.refresh_filters();
        assert_eq!(app.result_count(), 1);

        app.remove_badge("importance");
        assert_eq!(app.result_count(), 2);
        app.clear_filters();
        assert_eq!(app.result_count(), 3);
    }

    #[test]
    fn test_filter_menu_toggle() {
        let mut app = create_test_app();
        app.toggle_filter_menu();
        assert_eq!(app.ui_mode, UiMode::FilterMenu);
        app.toggle_filter_menu();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_activate_row_opens_detail() {
        let mut app = create_test_app();
        app.table.next();
        assert_eq!(app.activate_row(), Some(1));
        assert_eq!(app.ui_mode, UiMode::RowDetail(1));
    }

    #[test]
    fn test_cli_sort_resolves_column() {
        let mut app = AppState::new(Config::default(), None);
        app.cli_sort = Some(("TITLE".to_string(), SortDirection::Descending));
        app.load_data(create_test_rows(), create_test_columns(), None);
        assert_eq!(
            app.table.sort(),
            Some(SortState {
                column: 0,
                direction: SortDirection::Descending
            })
        );
    }

    #[test]
    fn test_view_state_restored_on_reload() {
        let dir = TempDir::new().unwrap();
        let persistence = PersistenceManager::with_dir(dir.path().to_path_buf()).unwrap();
        let mut app = AppState::new(Config::default(), Some(persistence));
        let path = Some("/tmp/issues.json".to_string());
        app.load_data(create_test_rows(), create_test_columns(), path.clone());

        app.active_filters.toggle("customer", "Acme");
        app.refresh_filters();
        app.table.toggle_sort(0);
        app.save_state();

        app.load_data(create_test_rows(), create_test_columns(), path);
        assert!(app.active_filters.is_checked("customer", "Acme"));
        assert_eq!(app.result_count(), 1);
        assert_eq!(app.table.sort().map(|s| s.column), Some(0));
    }

    #[test]
    fn test_stale_saved_filters_dropped_on_reload() {
        let dir = TempDir::new().unwrap();
        let persistence = PersistenceManager::with_dir(dir.path().to_path_buf()).unwrap();
        let mut app = AppState::new(Config::default(), Some(persistence));
        let path = Some("/tmp/issues.json".to_string());
        app.load_data(create_test_rows(), create_test_columns(), path.clone());

        app.active_filters.toggle("customer", "Acme");
        app.active_filters.toggle("customer", "Globex");
        app.save_state();

        // Acme no longer appears in the data
        let rows: Vec<Row> = create_test_rows()
            .into_iter()
            .filter(|r| r.get("customer") != Some("Acme"))
            .collect();
        app.load_data(rows, create_test_columns(), path);

        assert!(!app.active_filters.is_checked("customer", "Acme"));
        assert!(app.active_filters.is_checked("customer", "Globex"));
        assert_eq!(app.active_filters.len(), 1);
        assert_eq!(app.result_count(), 2);
    }

    #[test]
    fn test_mixed_case_filter_field() {
        let config = Config {
            filter_fields: vec!["Customer".to_string()],
            ..Config::default()
        };
        let mut app = AppState::new(config, None);
        let rows = vec![
            Row::from_pairs([("Title", "a"), ("Customer", "Acme")]),
            Row::from_pairs([("Title", "b"), ("Customer", "Globex")]),
        ];
        let columns = vec![
            Column::new("Title", "Title"),
            Column::new("Customer", "Customer"),
        ];
        app.load_data(rows, columns, None);

        app.open_filter_menu();
        // Expand "Customer" and check "Acme"
        app.menu_activate();
        app.menu.next();
        app.menu_activate();

        assert!(app.active_filters.is_checked("Customer", "Acme"));
        assert_eq!(app.result_count(), 1);
    }
}
