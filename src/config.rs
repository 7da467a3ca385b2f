use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::procfs::{DEFAULT_OS_RELEASE, DEFAULT_PASSWD, DEFAULT_PROC_ROOT};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Interval between the two CPU samples, in milliseconds. 0 disables
    /// the second sample and with it the utilization figure.
    pub sample_ms: u64,
    pub output: String,
    pub rows: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            sample_ms: 250,
            output: "table".to_string(),
            rows: 20,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub proc_root: PathBuf,
    pub os_release: PathBuf,
    pub passwd: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
            passwd: PathBuf::from(DEFAULT_PASSWD),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("proctop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
