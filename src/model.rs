//! Core data types for the consumption forecasting tool.
//!
//! This module defines the shared domain model imported by all other modules:
//! the prediction request the oracle consumes, the points a projection
//! produces, and the crate-wide error type. It contains no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::oracle::OracleError;

// ---------------------------------------------------------------------------
// Feature layout
// ---------------------------------------------------------------------------

/// Number of features the oracle was trained on.
pub const FEATURE_COUNT: usize = 5;

/// Column names of the feature row, in the order the oracle expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["ano", "mes", "sigla_uf", "tipo_consumo", "numero_consumidores"];

/// A single input row for the oracle.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Earliest date offered to users (the dataset starts in 2004).
pub const MIN_YEAR: i32 = 2004;

/// Latest date offered to users.
pub const MAX_YEAR: i32 = 2050;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// One query to the oracle.
///
/// Built fresh per oracle call from a user selection. Two requests with the
/// same fields are interchangeable; there is no identity beyond the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub year: i32,
    pub month: u32,          // 1..=12
    pub state_code: u8,      // 1..=27, see states::STATE_REGISTRY
    pub consumption_code: u8, // 1..=6, see consumption::CONSUMPTION_REGISTRY
    pub consumers: u64,
}

impl PredictionRequest {
    /// Flattens the request into `[year, month, state, type, consumers]`.
    pub fn features(&self) -> FeatureRow {
        [
            f64::from(self.year),
            f64::from(self.month),
            f64::from(self.state_code),
            f64::from(self.consumption_code),
            self.consumers as f64,
        ]
    }

    /// Same request, moved to another calendar month.
    pub fn at(&self, year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..*self
        }
    }
}

/// One month of a projection: the first day of the month and the predicted
/// consumption in MWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a prediction, projection or exploratory run.
#[derive(Debug)]
pub enum ForecastError {
    /// The state name is not one of the 27 federative units.
    UnknownState(String),
    /// The consumption-type name is not one of the six categories.
    UnknownConsumptionType(String),
    /// A (year, month) pair that cannot be represented as a calendar date.
    DateOutOfRange { year: i32, month: u32 },
    /// The oracle failed to load or to answer.
    Oracle(OracleError),
    /// The historical dataset could not be read.
    Dataset(DatasetError),
    /// The configuration could not be loaded.
    Config(ConfigError),
    /// Writing an export or chart failed at the filesystem level.
    Io(std::io::Error),
    /// The charting backend reported an error.
    Chart(String),
    /// A user-supplied argument is outside its allowed domain.
    InvalidInput(String),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::UnknownState(name) => write!(f, "Unknown state: {}", name),
            ForecastError::UnknownConsumptionType(name) => {
                write!(f, "Unknown consumption type: {}", name)
            }
            ForecastError::DateOutOfRange { year, month } => {
                write!(f, "Date out of range: {}-{:02}", year, month)
            }
            ForecastError::Oracle(e) => write!(f, "Oracle error: {}", e),
            ForecastError::Dataset(e) => write!(f, "Dataset error: {}", e),
            ForecastError::Config(e) => write!(f, "Config error: {}", e),
            ForecastError::Io(e) => write!(f, "I/O error: {}", e),
            ForecastError::Chart(msg) => write!(f, "Chart error: {}", msg),
            ForecastError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ForecastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForecastError::Oracle(e) => Some(e),
            ForecastError::Dataset(e) => Some(e),
            ForecastError::Config(e) => Some(e),
            ForecastError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OracleError> for ForecastError {
    fn from(e: OracleError) -> Self {
        ForecastError::Oracle(e)
    }
}

impl From<DatasetError> for ForecastError {
    fn from(e: DatasetError) -> Self {
        ForecastError::Dataset(e)
    }
}

impl From<ConfigError> for ForecastError {
    fn from(e: ConfigError) -> Self {
        ForecastError::Config(e)
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(e: std::io::Error) -> Self {
        ForecastError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
