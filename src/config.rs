use serde::Deserialize;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use anyhow::Result;
use std::fs;
use log::debug;

use crate::model::FieldFilter;

pub const APP_QUALIFIER: (&str, &str, &str) = ("org", "catalog-search", "catalog-search");

pub fn project_dirs() -> Option<ProjectDirs> {
    let (qualifier, organization, application) = APP_QUALIFIER;
    ProjectDirs::from(qualifier, organization, application)
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    /// Directory holding `<dataset>.json` files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_dataset")]
    pub default_dataset: String,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_dataset() -> String { "single_skill".to_string() }
fn default_history_size() -> usize { 10 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_dataset: default_dataset(),
            history_size: default_history_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_filter: FieldFilter,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.general
            .data_dir
            .clone()
            .unwrap_or_else(|| Path::new("data").join("json"))
    }
}

pub fn config_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        debug!("No config at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content).map_err(crate::error::CatalogError::from)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.general.history_size, 10);
        assert_eq!(config.general.default_dataset, "single_skill");
        assert_eq!(config.search.default_filter, FieldFilter::All);
        assert_eq!(config.data_dir(), Path::new("data").join("json"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[general]\ndata_dir = \"/srv/catalog\"\n\n[search]\ndefault_filter = \"keywords\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/catalog"));
        assert_eq!(config.general.history_size, 10);
        assert_eq!(config.search.default_filter, FieldFilter::Keywords);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\ndefault_filter = \"lyrics\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
