//! `converter.ron` loading.
//!
//! Every field is optional; a missing file means defaults. The path can be
//! overridden with `CONVERTER_CONFIG`.

use std::fs;
use std::path::{Path, PathBuf};

use converter_core::TargetFormat;
use converter_engine::{EngineConfig, DEFAULT_VERSION_TAG};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "converter.ron";
const CONFIG_ENV: &str = "CONVERTER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub version_tag: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
    pub initial_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            version_tag: DEFAULT_VERSION_TAG.to_string(),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("converter.log"),
            log_level: "info".to_string(),
            initial_format: "excel".to_string(),
        }
    }
}

impl AppConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            output_dir: self.output_dir.clone(),
            version_tag: self.version_tag.clone(),
        }
    }

    /// Falls back to Excel for unknown names.
    pub fn initial_format(&self) -> TargetFormat {
        self.initial_format.parse().unwrap_or_default()
    }

    /// Falls back to `Info` for unknown names.
    pub fn log_level(&self) -> LevelFilter {
        converter_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
