use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "configurator.toml";
pub const DEFAULT_BASE_URL: &str = "https://floor-and-design.fr/wp-content/uploads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("base_url in {} ('{base_url}') must be an http(s) URL", .path.display())]
    InvalidBaseUrl { path: PathBuf, base_url: String },
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub color_table: PathBuf,
    pub counter_file: PathBuf,
    pub output_file: PathBuf,
    pub log_file: PathBuf,
    pub first_image_id: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            color_table: PathBuf::from("correspondance_rgba.csv"),
            counter_file: PathBuf::from("last_record.json"),
            output_file: PathBuf::from("configurator.json"),
            log_file: PathBuf::from("configurator.log"),
            first_image_id: 100_000,
        }
    }
}

impl Config {
    fn validate(&self, file_path: &Path) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidBaseUrl {
                path: file_path.to_path_buf(),
                base_url: self.base_url.clone(),
            })
        }
    }
}

/// Loads `file_path`, falling back to [`Config::default`] when the file does not exist.
pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(file_path) {
        Ok(contents) => {
            let loaded_config = toml::from_str::<Config>(&contents).map_err(|source| {
                ConfigError::Parse {
                    path: file_path.to_path_buf(),
                    source,
                }
            })?;
            loaded_config.validate(file_path)?;
            Ok(loaded_config)
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Config::default()),
        Err(source) => Err(ConfigError::Read {
            path: file_path.to_path_buf(),
            source,
        }),
    }
}
