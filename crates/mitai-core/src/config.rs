use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::MitaiError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Placeholder cards shown while a search is in flight.
    pub placeholder_cards: usize,
    /// Hand links to the system opener instead of only printing them.
    pub open_links: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load config: the user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, MitaiError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::defaults()
        }
    }

    /// Load config from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, MitaiError> {
        let user_str =
            std::fs::read_to_string(path).map_err(|e| MitaiError::Config(e.to_string()))?;
        let config: AppConfig =
            toml::from_str(&user_str).map_err(|e| MitaiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<Self, MitaiError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| MitaiError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<(), MitaiError> {
        if self.catalog.per_page == 0 {
            return Err(MitaiError::Config("catalog.per_page must be at least 1".into()));
        }
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the watchlist database: the configured one, or the data dir.
    pub fn db_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.data_dir().join("mitai.db"))
                .unwrap_or_else(|| PathBuf::from("mitai.db"))
        })
    }

    /// Ensure the database directory exists and return the DB path.
    pub fn ensure_db_path(&self) -> Result<PathBuf, MitaiError> {
        let path = self.db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Directory for log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "mitai")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::defaults().expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.endpoint, "https://graphql.anilist.co");
        assert_eq!(config.catalog.per_page, 18);
        assert_eq!(config.ui.placeholder_cards, 8);
        assert!(config.ui.open_links);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.catalog.per_page, config.catalog.per_page);
        assert_eq!(deserialized.catalog.endpoint, config.catalog.endpoint);
    }

    #[test]
    fn test_load_from_file_with_storage_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[catalog]
endpoint = "http://localhost:9000"
per_page = 6

[ui]
placeholder_cards = 3
open_links = false

[storage]
path = "/tmp/mitai-test.db"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.catalog.per_page, 6);
        assert!(!config.ui.open_links);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/mitai-test.db"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[catalog]\nendpoint = \"x\"\nper_page = 0\n[ui]\nplaceholder_cards = 8\nopen_links = true\n",
        )
        .unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(MitaiError::Config(_))
        ));
    }
}
