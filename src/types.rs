use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::constants::{DEFAULT_FILTER_FIELDS, DEFAULT_PAGE_SIZE};

/// A single table row: field name to cell text, in the order the fields
/// were first read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Row::new();
        for (key, value) in pairs {
            row.insert(key, value);
        }
        row
    }

    /// Set a field, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One checked checkbox in the filter menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub group: String,
    pub value: String,
}

impl ActiveFilter {
    pub fn new(group: impl Into<String>, value: impl Into<String>) -> Self {
        ActiveFilter {
            group: group.into(),
            value: value.into(),
        }
    }
}

/// One section of the filter dropdown: a field and its distinct values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FocusTarget {
    Header,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiMode {
    Normal,
    FilterMenu,
    /// Row detail popup for the row at this index into the data set
    RowDetail(usize),
    Help,
    ErrorPopup(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter_fields: Vec<String>,
    pub full_width: bool,
    pub page_size: usize,
    pub remember_filters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            filter_fields: DEFAULT_FILTER_FIELDS.iter().map(|f| f.to_string()).collect(),
            full_width: false,
            page_size: DEFAULT_PAGE_SIZE,
            remember_filters: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    Idle,
    /// `started` drives the spinner animation across frames
    LoadingData { file_path: String, started: Instant },
}

impl LoadingState {
    pub fn loading(file_path: impl Into<String>) -> Self {
        LoadingState::LoadingData {
            file_path: file_path.into(),
            started: Instant::now(),
        }
    }
}
