use crate::constants::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::types::{ActiveFilter, Config, SortState};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// What the user last looked at in a data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_filters: Vec<ActiveFilter>,
    pub sort: Option<SortState>,
    pub last_opened: DateTime<Utc>,
}

pub struct PersistenceManager {
    config_dir: PathBuf,
}

impl PersistenceManager {
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("", "", "tabula").context("Failed to determine config directory")?;

        Self::with_dir(project_dirs.config_dir().to_path_buf())
    }

    /// Use `config_dir` for all state files, creating it if needed
    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        Ok(PersistenceManager { config_dir })
    }

    // Config methods
    pub fn load_config(&self) -> Result<Config> {
        let config_path = self.config_dir.join("config.json");

        if !config_path.exists() {
            let config = Config::default();
            self.save_config(&config)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let mut config: Config = serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse config file: {}. Using defaults.", e);
            Config::default()
        });

        config.page_size = config.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        config.filter_fields.retain(|f| !f.trim().is_empty());

        Ok(config)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        let config_path = self.config_dir.join("config.json");
        let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    // View state methods, keyed by data file path
    fn load_view_states(&self) -> Result<HashMap<String, ViewState>> {
        let state_path = self.config_dir.join("view_state.json");

        if !state_path.exists() {
            return Ok(HashMap::new());
        }

        let content =
            fs::read_to_string(&state_path).context("Failed to read view state file")?;

        let states: HashMap<String, ViewState> =
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse view state file: {}. Starting fresh.", e);
                HashMap::new()
            });

        Ok(states)
    }

    pub fn load_view_state(&self, data_path: &str) -> Result<Option<ViewState>> {
        let mut states = self.load_view_states()?;
        Ok(states.remove(&compute_path_hash(data_path)))
    }

    pub fn save_view_state(&self, data_path: &str, state: ViewState) -> Result<()> {
        let mut states = self.load_view_states()?;
        states.insert(compute_path_hash(data_path), state);

        let state_path = self.config_dir.join("view_state.json");
        let content =
            serde_json::to_string_pretty(&states).context("Failed to serialize view state")?;

        fs::write(&state_path, content).context("Failed to write view state file")?;

        Ok(())
    }
}

// Key for a data file path (16 hex chars). `DefaultHasher` output may change
// between Rust releases, which orphans saved view state.
fn compute_path_hash(path: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    let hash = hasher.finish();

    format!("{:016x}", hash)
}

// Helper function to canonicalize path
pub fn canonicalize_path(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);
    let canonical =
        fs::canonicalize(&path_buf).context(format!("Failed to canonicalize path: {}", path))?;

    canonical
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Path contains invalid UTF-8"))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortDirection;
    use tempfile::TempDir;

    fn create_manager() -> (TempDir, PersistenceManager) {
        let dir = TempDir::new().unwrap();
        let manager = PersistenceManager::with_dir(dir.path().join("tabula")).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_default_config_written_on_first_load() {
        let (dir, manager) = create_manager();
        let config = manager.load_config().unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("tabula").join("config.json").exists());
    }

    #[test]
    fn test_config_is_clamped() {
        let (dir, manager) = create_manager();
        fs::write(
            dir.path().join("tabula").join("config.json"),
            r#"{"page_size": 5000, "filter_fields": ["type", " "]}"#,
        )
        .unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.filter_fields, vec!["type".to_string()]);
        assert!(!config.full_width);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_default() {
        let (dir, manager) = create_manager();
        fs::write(dir.path().join("tabula").join("config.json"), "not json").unwrap();
        assert_eq!(manager.load_config().unwrap(), Config::default());
    }

    #[test]
    fn test_view_state_round_trip_per_file() {
        let (_dir, manager) = create_manager();
        let state = ViewState {
            active_filters: vec![ActiveFilter::new("customer", "Acme")],
            sort: Some(SortState {
                column: 1,
                direction: SortDirection::Descending,
            }),
            last_opened: Utc::now(),
        };

        manager.save_view_state("/data/a.json", state.clone()).unwrap();
        assert_eq!(manager.load_view_state("/data/a.json").unwrap(), Some(state));
        assert_eq!(manager.load_view_state("/data/b.json").unwrap(), None);
    }
}
