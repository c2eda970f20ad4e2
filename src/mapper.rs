//! Input mapping: selector labels and a calendar date to a prediction request.
//!
//! The selectors only ever offer registry labels, so a lookup miss here is a
//! wiring bug upstream. It still surfaces as an error rather than a default
//! code; the oracle would happily score a made-up state.

use chrono::{Datelike, NaiveDate};

use crate::consumption::ConsumptionType;
use crate::model::{ForecastError, PredictionRequest, Result};
use crate::states;

/// Feature code for an exact state name.
pub fn state_code(name: &str) -> Result<u8> {
    states::find_state(name)
        .map(|s| s.code)
        .ok_or_else(|| ForecastError::UnknownState(name.to_string()))
}

/// Feature code for an exact consumption-type label.
pub fn consumption_type_code(name: &str) -> Result<u8> {
    ConsumptionType::from_name(name)
        .map(ConsumptionType::code)
        .ok_or_else(|| ForecastError::UnknownConsumptionType(name.to_string()))
}

/// Calendar year and month (1..=12) of a date. The day is ignored.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// Builds the oracle request for one form submission.
///
/// Does not check the year against the selector's date range; that is the
/// caller's job.
pub fn build_request(
    state: &str,
    consumption_type: &str,
    date: NaiveDate,
    consumers: u64,
) -> Result<PredictionRequest> {
    let state_code = state_code(state)?;
    let consumption_code = consumption_type_code(consumption_type)?;
    let (year, month) = year_month(date);

    Ok(PredictionRequest {
        year,
        month,
        state_code,
        consumption_code,
        consumers,
    })
}
