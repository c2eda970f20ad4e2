//! SVG charts for predictions and the historical dataset.
//!
//! All functions write a single SVG file and return `Ok(())` without
//! touching the filesystem when there is nothing to plot.

use std::path::Path;

use plotters::prelude::*;

use crate::dataset::Dataset;
use crate::logging::{self, Component};
use crate::model::{ForecastError, PredictionRequest, ProjectionPoint, Result};

const SIZE: (u32, u32) = (900, 500);
const FONT: &str = "sans-serif";

fn chart_err<E: std::fmt::Display>(e: E) -> ForecastError {
    ForecastError::Chart(e.to_string())
}

/// Value range with 5% headroom on both sides, widened if degenerate.
fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        let pad = if min.abs() < f64::EPSILON { 1.0 } else { min.abs() * 0.1 };
        return (min - pad, max + pad);
    }
    (min - span * 0.05, max + span * 0.05)
}

/// One year either side of `year`, clamped to the `i32` domain.
fn year_span(year: i32) -> std::ops::Range<i32> {
    year.saturating_sub(1)..year.saturating_add(1)
}

fn wrote(path: &Path) {
    logging::info(Component::Chart, None, &format!("Wrote {}", path.display()));
}

// ---------------------------------------------------------------------------
// Single prediction
// ---------------------------------------------------------------------------

/// Bar with the predicted value, next to a marker for the submitted inputs
/// (year on x, number of consumers on y).
pub fn prediction_chart(request: &PredictionRequest, predicted: f64, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let (left, right) = root.split_horizontally(SIZE.0 / 2);

    // Bar panel
    let lo = predicted.min(0.0);
    let hi = predicted.max(0.0);
    let (y_lo, y_hi) = padded_range([lo, hi]);
    let mut bar = ChartBuilder::on(&left)
        .caption("Predicted value", (FONT, 20))
        .margin(12)
        .x_label_area_size(20)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..1f64, y_lo..y_hi)
        .map_err(chart_err)?;
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc("MWh")
        .draw()
        .map_err(chart_err)?;
    bar.draw_series(std::iter::once(Rectangle::new(
        [(0.25, 0.0), (0.75, predicted)],
        BLUE.mix(0.8).filled(),
    )))
    .map_err(chart_err)?;
    bar.draw_series(std::iter::once(Text::new(
        format!("{:.2}", predicted),
        (0.4, predicted),
        (FONT, 16).into_font(),
    )))
    .map_err(chart_err)?;

    // Input panel
    let consumers = request.consumers as f64;
    let mut inputs = ChartBuilder::on(&right)
        .caption("Inputs", (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(year_span(request.year), 0f64..(consumers * 1.2 + 1.0))
        .map_err(chart_err)?;
    inputs
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Consumers")
        .draw()
        .map_err(chart_err)?;
    inputs
        .draw_series(std::iter::once(Circle::new(
            (request.year, consumers),
            8,
            RED.mix(0.7).filled(),
        )))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    wrote(path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

pub fn projection_chart(points: &[ProjectionPoint], title: &str, path: &Path) -> Result<()> {
    if points.is_empty() {
        return Ok(());
    }

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let (y_lo, y_hi) = padded_range(points.iter().map(|p| p.value));
    let last = points.len() - 1;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0..last.max(1), y_lo..y_hi)
        .map_err(chart_err)?;

    let month_label = |i: &usize| {
        points
            .get(*i)
            .map(|p| p.date.format("%Y-%m").to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(points.len().min(12))
        .x_label_formatter(&month_label)
        .y_desc("MWh")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().enumerate().map(|(i, p)| (i, p.value)),
            &BLUE,
        ))
        .map_err(chart_err)?;
    chart
        .draw_series(
            points
                .iter()
                .enumerate()
                .map(|(i, p)| Circle::new((i, p.value), 3, BLUE.filled())),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    wrote(path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Dataset views
// ---------------------------------------------------------------------------

fn month_color(month: u32) -> HSLColor {
    HSLColor(f64::from(month.saturating_sub(1)) / 12.0, 0.7, 0.45)
}

/// Every row as a point: year on x, consumption on y, coloured by month.
pub fn dataset_scatter(dataset: &Dataset, path: &Path) -> Result<()> {
    let (Some((first, last)), Some((_, max))) = (dataset.year_range(), dataset.consumption_range())
    else {
        return Ok(());
    };

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Consumption by year (colour = month)", (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            first.saturating_sub(1)..last.saturating_add(1),
            0f64..(max * 1.05).max(1.0),
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("MWh")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            dataset
                .scatter_points()
                .into_iter()
                .map(|(year, value, month)| {
                    Circle::new((year, value), 3, month_color(month).filled())
                }),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    wrote(path);
    Ok(())
}

/// `(year, month, bottom, top)` for every monthly slice of the yearly bars,
/// slices stacked in month order.
fn stacked_segments(dataset: &Dataset) -> Vec<(i32, u32, f64, f64)> {
    let mut segments = Vec::new();
    let mut stack: Option<(i32, f64)> = None;
    for ((year, month), total) in dataset.year_month_totals() {
        let bottom = match stack {
            Some((y, top)) if y == year => top,
            _ => 0.0,
        };
        segments.push((year, month, bottom, bottom + total));
        stack = Some((year, bottom + total));
    }
    segments
}

/// Total consumption per year, each bar stacked by month.
pub fn annual_bar_chart(dataset: &Dataset, path: &Path) -> Result<()> {
    let Some((first, last)) = dataset.year_range() else {
        return Ok(());
    };
    let segments = stacked_segments(dataset);
    let max = segments.iter().map(|s| s.3).fold(0.0, f64::max);
    let years = usize::try_from(i64::from(last) - i64::from(first) + 1).unwrap_or(usize::MAX);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Total consumption per year (colour = month)", (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(
            (f64::from(first) - 0.5)..(f64::from(last) + 0.5),
            0f64..(max * 1.05).max(1.0),
        )
        .map_err(chart_err)?;

    let year_label = |x: &f64| {
        if x.fract() == 0.0 {
            format!("{:.0}", x)
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(years.min(12) + 1)
        .x_label_formatter(&year_label)
        .x_desc("Year")
        .y_desc("MWh")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(segments.iter().map(|&(year, month, bottom, top)| {
            let x = f64::from(year);
            Rectangle::new([(x - 0.4, bottom), (x + 0.4, top)], month_color(month).filled())
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    wrote(path);
    Ok(())
}

/// Mean consumption per calendar month as a line.
pub fn monthly_line_chart(dataset: &Dataset, path: &Path) -> Result<()> {
    let means = dataset.monthly_means();
    if means.is_empty() {
        return Ok(());
    }

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let (y_lo, y_hi) = padded_range(means.values().copied());
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean consumption per month", (FONT, 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(1u32..12u32, y_lo..y_hi)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .x_labels(12)
        .x_desc("Month")
        .y_desc("MWh")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(means.iter().map(|(m, v)| (*m, *v)), &RED))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    wrote(path);
    Ok(())
}
