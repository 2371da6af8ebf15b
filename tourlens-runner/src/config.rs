//! Runner configuration, read from `tourlens.toml`.
//!
//! ```toml
//! [data]
//! path = "ts_stream_data.csv"
//! date_column = "Date"
//!
//! [window]
//! half_width_days = 30
//! alpha = 0.05
//! welch_test = true
//! near_zero_baseline = 0.1
//!
//! [events]
//! Tokyo = "Feb 7, 2024"
//! Paris = "2024-06-03"
//! ```
//!
//! Every section is optional. Without `[events]` the built-in tour table is
//! used. The order of `[events]` entries is the order cities are listed in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tourlens_core::data::LoadOptions;
use tourlens_core::{CompareSettings, EventRegistry, RegistryError, MAX_HALF_WIDTH_DAYS};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "tourlens.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("event table: {0}")]
    Events(#[from] RegistryError),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// `[data]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    pub date_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ts_stream_data.csv"),
            date_column: "Date".into(),
        }
    }
}

/// Whole config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub data: DataConfig,
    pub window: CompareSettings,
    /// City → date text. `None` means use the built-in tour.
    pub events: Option<toml::Table>,
}

impl RunnerConfig {
    /// Load a config file. Relative data paths resolve against the file's
    /// directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if config.data.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data.path = dir.join(&config.data.path);
            }
        }
        Ok(config)
    }

    /// Parse and validate a config string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Use `explicit` if given, else `tourlens.toml` in the working
    /// directory if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_HALF_WIDTH_DAYS).contains(&self.window.half_width_days) {
            return Err(ConfigError::Invalid(format!(
                "window.half_width_days must be between 0 and {MAX_HALF_WIDTH_DAYS}, got {}",
                self.window.half_width_days
            )));
        }
        if !(self.window.alpha > 0.0 && self.window.alpha < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "window.alpha must be in (0, 1), got {}",
                self.window.alpha
            )));
        }
        if !(self.window.near_zero_baseline >= 0.0) {
            return Err(ConfigError::Invalid(
                "window.near_zero_baseline must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Build the event registry from `[events]` or the built-in tour.
    pub fn registry(&self) -> Result<EventRegistry, ConfigError> {
        let Some(table) = &self.events else {
            return Ok(EventRegistry::default_tour());
        };

        let mut pairs = Vec::with_capacity(table.len());
        for (city, value) in table {
            let raw = value.as_str().ok_or_else(|| {
                ConfigError::Invalid(format!("events.{city} must be a date string"))
            })?;
            pairs.push((city.clone(), raw.to_string()));
        }
        Ok(EventRegistry::from_pairs(pairs)?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            date_column: self.data.date_column.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_config_is_all_defaults() {
        let c = RunnerConfig::from_toml("").unwrap();
        assert_eq!(c.data, DataConfig::default());
        assert_eq!(c.window, CompareSettings::default());
        assert_eq!(c.registry().unwrap().len(), 10);
    }

    #[test]
    fn partial_window_section() {
        let c = RunnerConfig::from_toml("[window]\nhalf_width_days = 14\n").unwrap();
        assert_eq!(c.window.half_width_days, 14);
        assert_eq!(c.window.alpha, 0.05);
    }

    #[test]
    fn events_keep_file_order() {
        let c = RunnerConfig::from_toml(
            "[events]\nZurich = \"2024-07-09\"\nAmsterdam = \"Jul 4, 2024\"\nMilan = \"2024-07-13\"\n",
        )
        .unwrap();
        let r = c.registry().unwrap();
        assert_eq!(r.entities(), vec!["Zurich", "Amsterdam", "Milan"]);
        assert_eq!(
            r.lookup("Amsterdam").unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
        );
    }

    #[test]
    fn non_string_event_is_invalid() {
        let c = RunnerConfig::from_toml("[events]\nZurich = 20240709\n").unwrap();
        assert!(matches!(c.registry(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bad_event_date() {
        let c = RunnerConfig::from_toml("[events]\nZurich = \"soon\"\n").unwrap();
        assert!(matches!(c.registry(), Err(ConfigError::Events(_))));
    }

    #[test]
    fn rejects_bad_alpha() {
        assert!(matches!(
            RunnerConfig::from_toml("[window]\nalpha = 1.5\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_negative_half_width() {
        assert!(matches!(
            RunnerConfig::from_toml("[window]\nhalf_width_days = -1\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_half_width_beyond_cap() {
        let ok = format!("[window]\nhalf_width_days = {MAX_HALF_WIDTH_DAYS}\n");
        assert!(RunnerConfig::from_toml(&ok).is_ok());
        for days in [MAX_HALF_WIDTH_DAYS + 1, 1_000_000_000_000] {
            let toml = format!("[window]\nhalf_width_days = {days}\n");
            assert!(matches!(
                RunnerConfig::from_toml(&toml),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn from_file_resolves_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourlens.toml");
        std::fs::write(&path, "[data]\npath = \"streams.csv\"\n").unwrap();
        let c = RunnerConfig::from_file(&path).unwrap();
        assert_eq!(c.data.path, dir.path().join("streams.csv"));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let err = RunnerConfig::discover(Some(Path::new("/nonexistent/tourlens.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
