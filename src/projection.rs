//! Month-by-month projection.
//!
//! Starting from the month the user selected, walk forward one calendar
//! month at a time and ask the oracle for each. State, consumption type and
//! consumer count stay fixed; only the calendar fields move.

use chrono::NaiveDate;

use crate::logging::{self, Component};
use crate::model::{ForecastError, PredictionRequest, ProjectionPoint, Result};
use crate::oracle::Oracle;

/// Months projected when the configuration does not say otherwise.
pub const DEFAULT_HORIZON: usize = 12;

// ---------------------------------------------------------------------------
// Month window
// ---------------------------------------------------------------------------

/// The `n` calendar months strictly after a starting (year, month).
///
/// Lazy and finite. Cloning a window before iterating gives an independent
/// copy that replays the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    year: i32,
    month: u32,
    remaining: usize,
}

impl MonthWindow {
    pub fn after(year: i32, month: u32, n: usize) -> Self {
        MonthWindow {
            year,
            month,
            remaining: n,
        }
    }
}

impl Iterator for MonthWindow {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // One step never crosses more than one year boundary.
        self.month += 1;
        if self.month > 12 {
            self.month = 1;
            self.year = self.year.saturating_add(1);
        }
        Some((self.year, self.month))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for MonthWindow {}

/// First day of a calendar month.
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(ForecastError::DateOutOfRange { year, month })
}

// ---------------------------------------------------------------------------
// Projection loop
// ---------------------------------------------------------------------------

/// Predicts the `horizon` months following `base`'s month.
///
/// Output is chronological and has exactly `horizon` entries. The first
/// entry is the month after `base`, not `base` itself. If the oracle fails
/// for any month, the whole projection fails; no partial series is returned.
pub fn project<O: Oracle + ?Sized>(
    oracle: &O,
    base: &PredictionRequest,
    horizon: usize,
) -> Result<Vec<ProjectionPoint>> {
    let mut points = Vec::with_capacity(horizon);

    for (year, month) in MonthWindow::after(base.year, base.month, horizon) {
        let request = base.at(year, month);
        let date = month_start(year, month)?;
        let value = oracle.predict_request(&request).map_err(|e| {
            logging::error(
                Component::Projection,
                Some(&date.format("%Y-%m").to_string()),
                &format!("Oracle failed, aborting projection: {}", e),
            );
            ForecastError::from(e)
        })?;
        points.push(ProjectionPoint { date, value });
    }

    logging::debug(
        Component::Projection,
        None,
        &format!(
            "Projected {} months after {}-{:02}",
            points.len(),
            base.year,
            base.month
        ),
    );

    Ok(points)
}
