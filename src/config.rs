use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_STORE_FILE;

const APP_NAME: &str = "medichat";
const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_ROW_LIMIT: usize = 200;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Store file. `~` and `$VAR` components are expanded.
    pub database: PathBuf,
    /// Rows fetched per table page or query.
    pub row_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_STORE_FILE),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl Config {
    /// Load `config.yaml` from the app config directory, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_app_config_path()?.join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_slice(&data)
            .with_context(|| format!("failed to parse YAML at {}", path.display()))?;
        Ok(config)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        expand_path(&self.database)
            .ok_or_else(|| anyhow::anyhow!("cannot expand file path {}", self.database.display()))
    }
}

/// Return the application config directory path, creating it if missing.
pub fn get_app_config_path() -> Result<PathBuf> {
    let mut path = if cfg!(target_os = "macos") {
        dirs_next::home_dir().map(|h| h.join(".config"))
    } else {
        dirs_next::config_dir()
    }
    .ok_or_else(|| anyhow::anyhow!("failed to find os config dir."))?;

    path.push(APP_NAME);
    fs::create_dir_all(&path)?;
    Ok(path)
}

pub fn expand_path(path: &Path) -> Option<PathBuf> {
    let mut expanded_path = PathBuf::new();
    let mut path_iter = path.iter();
    if path.starts_with("~") {
        path_iter.next()?;
        expanded_path = expanded_path.join(dirs_next::home_dir()?);
    }
    for path in path_iter {
        let path = path.to_str()?;
        expanded_path = if cfg!(unix) && path.starts_with('$') {
            expanded_path.join(std::env::var(path.strip_prefix('$')?).unwrap_or_default())
        } else if cfg!(windows) && path.starts_with('%') && path.ends_with('%') {
            expanded_path
                .join(std::env::var(path.strip_prefix('%')?.strip_suffix('%')?).unwrap_or_default())
        } else {
            expanded_path.join(path)
        }
    }
    Some(expanded_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, PathBuf::from("medical.db"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "database: /tmp/clinic.db\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/clinic.db"));
        assert_eq!(config.row_limit, 200);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "row_limit: [many]\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn relative_paths_pass_through() {
        assert_eq!(
            expand_path(Path::new("data/medical.db")),
            Some(PathBuf::from("data/medical.db"))
        );
    }
}
