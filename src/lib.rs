//! Monthly electricity consumption forecasts for Brazilian states.
//!
//! A pre-trained linear model (the oracle) scores
//! `[year, month, state, consumption type, consumers]` rows. This crate maps
//! user selections onto that row, runs single predictions and month-by-month
//! projections, and renders them next to the historical dataset.

pub mod chart;
pub mod cli;
pub mod config;
pub mod consumption;
pub mod dataset;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod oracle;
pub mod projection;
pub mod report;
pub mod states;

pub use model::{ForecastError, PredictionRequest, ProjectionPoint, Result};
pub use oracle::{LinearModel, Oracle, OracleError};
