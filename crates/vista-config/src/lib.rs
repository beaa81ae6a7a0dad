//! Configuration for vista.
//!
//! Settings are read from `config.toml` in the platform config directory, or
//! from the file named by `VISTA_CONFIG`. Every key is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vista_core::ColorProfileKind;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "VISTA_CONFIG";

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where weather reports come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WeatherSource {
    /// Derive the time of day from the local clock; everything else is fair.
    Clock,
    /// Run a program and read its report from stdout.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Fetch a plain-text report over HTTP.
    Http { url: String },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the scene assets.
    pub scene_dir: PathBuf,
    pub weather: WeatherSource,
    /// Seconds between weather polls.
    pub poll_interval_secs: u64,
    /// Milliseconds between fade steps.
    pub fade_tick_ms: u64,
    /// Longest time between redraws, in milliseconds.
    pub redraw_interval_ms: u64,
    /// Forced color profile. Detected from the environment when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_profile: Option<ColorProfileKind>,
    /// Show the raw weather report under the scene.
    pub show_forecast: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scene_dir: PathBuf::from("scenes/meadow"),
            weather: WeatherSource::Clock,
            poll_interval_secs: 20,
            fade_tick_ms: 100,
            redraw_interval_ms: 1000,
            color_profile: None,
            show_forecast: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Location of the config file, if one can be determined.
    pub fn path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the config from its default location.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, contents).map_err(write_err)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn fade_tick(&self) -> Duration {
        Duration::from_millis(self.fade_tick_ms.max(1))
    }

    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms.max(1))
    }

    /// The color profile to render with.
    pub fn color_profile(&self) -> ColorProfileKind {
        self.color_profile.unwrap_or_else(ColorProfileKind::detect)
    }
}

/// Directory for the log file.
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "vista")
}
