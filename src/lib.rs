// Library exports for embedding the widgets and for testing
pub mod app;
pub mod async_tasks;
pub mod cli;
pub mod constants;
pub mod data;
pub mod error;
pub mod filter;
pub mod menu;
pub mod persistence;
pub mod selection;
pub mod table;
pub mod types;
pub mod ui;
