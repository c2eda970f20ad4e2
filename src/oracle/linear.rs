//! Linear regression oracle.
//!
//! The model is exported from the training notebook as a small JSON document
//! holding the fitted intercept and one coefficient per feature:
//!
//! ```json
//! {
//!   "intercept": -1523.7,
//!   "coefficients": [0.81, 12.4, -3.9, -41.0, 0.0021],
//!   "feature_names": ["ano", "mes", "sigla_uf", "tipo_consumo", "numero_consumidores"],
//!   "trained_at": "2023-06-01"
//! }
//! ```
//!
//! `feature_names` and `trained_at` are informational and optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Oracle, OracleError};
use crate::logging::{self, Component};
use crate::model::{FEATURE_COUNT, FEATURE_NAMES, FeatureRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
}

impl LinearModel {
    /// Builds a model from fitted parameters, checking the coefficient count.
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Result<Self, OracleError> {
        let model = LinearModel {
            intercept,
            coefficients,
            feature_names: Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect()),
            trained_at: None,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parses a JSON artifact.
    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        let model: LinearModel = serde_json::from_str(json)
            .map_err(|e| OracleError::Artifact(format!("invalid JSON: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Loads the artifact once at startup.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| OracleError::Artifact(format!("{}: {}", path.display(), e)))?;
        let model = Self::from_json(&json)?;

        logging::info(
            Component::Oracle,
            None,
            &format!(
                "Loaded linear model from {} (intercept {:.4}, {} coefficients)",
                path.display(),
                model.intercept,
                model.coefficients.len()
            ),
        );
        if let Some(names) = &model.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                logging::warn(
                    Component::Oracle,
                    None,
                    &format!(
                        "Artifact feature names {:?} differ from expected {:?}; \
                         coefficients are applied positionally",
                        names, FEATURE_NAMES
                    ),
                );
            }
        }

        Ok(model)
    }

    /// Writes the artifact as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), OracleError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| OracleError::Artifact(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| OracleError::Artifact(format!("{}: {}", path.display(), e)))
    }

    fn validate(&self) -> Result<(), OracleError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(OracleError::Shape {
                expected: FEATURE_COUNT,
                got: self.coefficients.len(),
            });
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(OracleError::Artifact("non-finite parameter".to_string()));
        }
        Ok(())
    }
}

impl Oracle for LinearModel {
    fn predict(&self, features: &FeatureRow) -> Result<f64, OracleError> {
        let value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>();

        if value.is_finite() {
            Ok(value)
        } else {
            Err(OracleError::NonFinite(value))
        }
    }
}
