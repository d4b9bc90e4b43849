//! Command-line interface parsing and validation
//!
//! This module handles CLI argument parsing using clap and validates
//! user inputs for correctness.

use crate::types::SortDirection;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version = "0.0.1")]
#[command(about = "Sort and filter tabular JSON data in your terminal", long_about = None)]
pub struct Cli {
    /// Path to a JSON file holding an array of objects
    pub file: Option<String>,

    /// Field offered in the filter menu (repeatable, overrides config)
    #[arg(short = 'f', long = "filter", value_name = "FIELD")]
    pub filter_fields: Vec<String>,

    /// Initial sort, e.g. `title` or `priority:desc`
    #[arg(short = 's', long, value_name = "COLUMN[:asc|desc]")]
    pub sort: Option<String>,

    /// Stretch the table to the full terminal width
    #[arg(short = 'w', long)]
    pub full_width: bool,

    /// Enable logging to specified file
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<String>,
}

impl Cli {
    /// Validate CLI arguments
    /// Returns error for blank filter fields or a malformed sort spec
    pub fn validate(&self) -> Result<(), String> {
        if self.filter_fields.iter().any(|f| f.trim().is_empty()) {
            return Err("Filter field names cannot be empty".to_string());
        }
        if self.sort.is_some() {
            self.sort_spec()?;
        }
        Ok(())
    }

    /// Parse `--sort` into a column name and direction
    pub fn sort_spec(&self) -> Result<Option<(String, SortDirection)>, String> {
        let Some(spec) = &self.sort else {
            return Ok(None);
        };

        let (column, direction) = match spec.split_once(':') {
            Some((column, dir)) => {
                let direction = match dir.to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Ascending,
                    "desc" => SortDirection::Descending,
                    other => return Err(format!("Unknown sort direction '{}'", other)),
                };
                (column, direction)
            }
            None => (spec.as_str(), SortDirection::Ascending),
        };

        if column.trim().is_empty() {
            return Err("Sort column cannot be empty".to_string());
        }
        Ok(Some((column.trim().to_string(), direction)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from([
            "tabula",
            "issues.json",
            "-f",
            "type",
            "--filter",
            "customer",
            "-s",
            "priority:desc",
        ]);
        assert_eq!(cli.file.as_deref(), Some("issues.json"));
        assert_eq!(cli.filter_fields, vec!["type", "customer"]);
        assert!(cli.validate().is_ok());
        assert_eq!(
            cli.sort_spec().unwrap(),
            Some(("priority".to_string(), SortDirection::Descending))
        );
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        let cli = Cli::parse_from(["tabula", "--sort", "title"]);
        assert_eq!(
            cli.sort_spec().unwrap(),
            Some(("title".to_string(), SortDirection::Ascending))
        );
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let cli = Cli::parse_from(["tabula", "--sort", "title:sideways"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["tabula", "--sort", ":desc"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["tabula", "-f", " "]);
        assert!(cli.validate().is_err());
    }
}
