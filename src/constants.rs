//! Application-wide constants

/// Minimum terminal width required to run the application
pub const MIN_TERMINAL_WIDTH: u16 = 60;

/// Minimum terminal height required to run the application
pub const MIN_TERMINAL_HEIGHT: u16 = 15;

/// Fields offered in the filter menu when neither config nor CLI name any
pub const DEFAULT_FILTER_FIELDS: [&str; 3] = ["importance", "type", "customer"];

/// Default number of rows moved by PageUp/PageDown
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Minimum allowed page size
pub const MIN_PAGE_SIZE: usize = 1;

/// Maximum allowed page size
pub const MAX_PAGE_SIZE: usize = 100;

/// Height of the filter bar (one content line inside a border)
pub const FILTER_BAR_HEIGHT: u16 = 3;

/// Width of the filter dropdown menu
pub const FILTER_MENU_WIDTH: u16 = 32;

/// Maximum width of a single table column (characters)
pub const MAX_COLUMN_WIDTH: u16 = 40;

/// Padding added on both sides of a column's content
pub const COLUMN_PADDING: u16 = 1;

/// Frame duration in milliseconds for the UI render loop (targeting 60 FPS)
pub const FRAME_DURATION_MS: u64 = 16;
