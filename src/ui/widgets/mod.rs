//! UI widget components
//!
//! This module contains the table, filter bar and filter menu widgets,
//! the loading indicator and modal popups.

pub mod data_table;
pub mod filter_bar;
pub mod filter_menu;
pub mod loading;
pub mod popups;
