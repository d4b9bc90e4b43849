//! Loading table rows from JSON and deriving a column schema

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::filter::display_name;
use crate::table::{Column, SortKind};
use crate::types::Row;

/// Read a JSON array of objects into rows.
///
/// Strings are kept verbatim, numbers and booleans are stringified. `null`,
/// arrays and objects leave the field missing.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let rows = parse_rows(&content)?;
    tracing::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn parse_rows(content: &str) -> Result<Vec<Row>> {
    let document: Value = serde_json::from_str(content)?;
    let Value::Array(items) = document else {
        return Err(AppError::InvalidData(
            "expected a JSON array of objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let Value::Object(map) = item else {
                return Err(AppError::InvalidData(format!(
                    "element {} is not an object",
                    idx
                )));
            };
            let mut row = Row::new();
            for (key, value) in map {
                match value {
                    Value::String(s) => row.insert(key, s),
                    Value::Number(n) => row.insert(key, n.to_string()),
                    Value::Bool(b) => row.insert(key, b.to_string()),
                    Value::Null | Value::Array(_) | Value::Object(_) => {
                        tracing::debug!("Skipping non-scalar field '{}' in row {}", key, idx);
                    }
                }
            }
            Ok(row)
        })
        .collect()
}

/// One column per field, in first-seen order.
///
/// A column sorts numerically when every present value parses as a number,
/// otherwise case-insensitively.
pub fn infer_columns(rows: &[Row]) -> Vec<Column> {
    let mut fields: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !fields.iter().any(|f| f == key) {
                fields.push(key.to_string());
            }
        }
    }

    fields
        .into_iter()
        .map(|field| {
            let numeric = rows
                .iter()
                .filter_map(|r| r.get(&field))
                .all(|v| v.trim().parse::<f64>().is_ok());
            let kind = if numeric {
                SortKind::Numeric
            } else {
                SortKind::Natural
            };
            Column::new(display_name(&field), field).sortable(kind)
        })
        .collect()
}
