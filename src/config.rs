//! Runtime configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults (`Config::default`)
//! 2. a TOML file, `mpcec.toml` in the working directory unless
//!    `MPCEC_CONFIG` points elsewhere
//! 3. `MPCEC_MODEL_PATH`, `MPCEC_DATASET_PATH`, `MPCEC_OUTPUT_DIR` and
//!    `MPCEC_LOG_LEVEL` environment variables (a `.env` file is honoured)
//!
//! A missing config file is not an error; a malformed one is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::logging::LogLevel;
use crate::model::{MAX_YEAR, MIN_YEAR};
use crate::projection::DEFAULT_HORIZON;

pub const DEFAULT_CONFIG_FILE: &str = "mpcec.toml";

/// Longest projection the tool will run (50 years of months).
pub const MAX_HORIZON: usize = 600;

// ---------------------------------------------------------------------------
// Config structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub forecast: ForecastConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Oracle artifact (JSON linear model).
    pub model: PathBuf,
    /// Historical consumption CSV.
    pub dataset: PathBuf,
    /// Where charts and exports are written.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon_months: usize,
    /// Date range offered to users. Requests outside it are rejected by the CLI.
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            model: PathBuf::from("modelo.json"),
            dataset: PathBuf::from("novos_dados.csv"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            horizon_months: DEFAULT_HORIZON,
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses a TOML document and validates it.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults if the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Full startup sequence: `.env`, config file, environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None)
    }

    /// Like `from_env`, but an explicit path (e.g. from `--config`) takes
    /// precedence over `MPCEC_CONFIG`. An explicit path must exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = match explicit {
            Some(p) if !p.exists() => {
                return Err(ConfigError::Io(format!("{}: file not found", p.display())));
            }
            Some(p) => p.to_path_buf(),
            None => std::env::var("MPCEC_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE)),
        };
        let mut config = Self::load_or_default(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `MPCEC_*` overrides read through `lookup`.
    ///
    /// Takes a lookup function instead of reading the process environment
    /// so tests stay independent of each other.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MPCEC_MODEL_PATH") {
            self.paths.model = PathBuf::from(v);
        }
        if let Some(v) = lookup("MPCEC_DATASET_PATH") {
            self.paths.dataset = PathBuf::from(v);
        }
        if let Some(v) = lookup("MPCEC_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("MPCEC_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let horizon = self.forecast.horizon_months;
        if horizon == 0 || horizon > MAX_HORIZON {
            return Err(ConfigError::Invalid(format!(
                "forecast.horizon_months must be in 1..={}, got {}",
                MAX_HORIZON, horizon
            )));
        }
        if self.forecast.min_year > self.forecast.max_year {
            return Err(ConfigError::Invalid(format!(
                "forecast.min_year ({}) is after forecast.max_year ({})",
                self.forecast.min_year, self.forecast.max_year
            )));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.logging.level.parse().map_err(ConfigError::Invalid)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "cannot parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
