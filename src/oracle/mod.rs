//! The prediction oracle.
//!
//! The oracle is a pre-trained regression model treated as a black box with
//! a single capability: score one feature row. Everything upstream (mapping,
//! projection, charts) depends on the `Oracle` trait, never on a concrete
//! model, so tests can inject stubs and other artifact formats can be added
//! without touching the projection loop.
//!
//! Submodules:
//! - `linear`: ordinary least squares model loaded from a JSON artifact.

pub mod linear;

pub use linear::LinearModel;

use crate::model::{FeatureRow, PredictionRequest};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

pub trait Oracle {
    /// Predicted consumption (MWh) for one feature row.
    fn predict(&self, features: &FeatureRow) -> Result<f64, OracleError>;

    fn predict_request(&self, request: &PredictionRequest) -> Result<f64, OracleError> {
        self.predict(&request.features())
    }

    /// Scores several rows; fails on the first row that fails.
    fn predict_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, OracleError> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn predict(&self, features: &FeatureRow) -> Result<f64, OracleError> {
        (**self).predict(features)
    }
}

impl<T: Oracle + ?Sized> Oracle for Box<T> {
    fn predict(&self, features: &FeatureRow) -> Result<f64, OracleError> {
        (**self).predict(features)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or querying an oracle.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The artifact is missing, unreadable, or not a valid model file.
    Artifact(String),
    /// The artifact's coefficient vector does not match the feature row.
    Shape { expected: usize, got: usize },
    /// The model produced NaN or an infinite value.
    NonFinite(f64),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::Artifact(msg) => write!(f, "Model artifact error: {}", msg),
            OracleError::Shape { expected, got } => {
                write!(f, "Model shape mismatch: expected {} coefficients, got {}", expected, got)
            }
            OracleError::NonFinite(v) => write!(f, "Model produced a non-finite value: {}", v),
        }
    }
}

impl std::error::Error for OracleError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubling;

    impl Oracle for Doubling {
        fn predict(&self, features: &FeatureRow) -> Result<f64, OracleError> {
            Ok(features[4] * 2.0)
        }
    }

    #[test]
    fn test_predict_request_uses_feature_row() {
        let request = PredictionRequest {
            year: 2020,
            month: 6,
            state_code: 20,
            consumption_code: 3,
            consumers: 21,
        };
        assert_eq!(Doubling.predict_request(&request), Ok(42.0));
    }

    #[test]
    fn test_batch_preserves_row_order() {
        let rows = [[0.0, 0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0, 0.0, 5.0]];
        assert_eq!(Doubling.predict_batch(&rows), Ok(vec![2.0, 10.0]));
    }

    #[test]
    fn test_boxed_and_borrowed_oracles_delegate() {
        let boxed: Box<dyn Oracle> = Box::new(Doubling);
        let row = [0.0, 0.0, 0.0, 0.0, 3.0];
        assert_eq!(boxed.predict(&row), Ok(6.0));
        assert_eq!((&Doubling).predict(&row), Ok(6.0));
    }
}
