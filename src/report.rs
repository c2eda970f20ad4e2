//! Terminal output and file exports for a forecast run.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::consumption::ConsumptionType;
use crate::dataset::Dataset;
use crate::model::{ForecastError, PredictionRequest, ProjectionPoint, Result};
use crate::states;

/// Everything one `predict` or `project` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub generated_at: String,
    pub request: PredictionRequest,
    pub state: String,
    pub consumption_type: String,
    pub prediction: f64,
    pub projection: Vec<ProjectionPoint>,
}

impl ForecastReport {
    pub fn new(
        request: PredictionRequest,
        prediction: f64,
        projection: Vec<ProjectionPoint>,
    ) -> Self {
        ForecastReport {
            generated_at: Utc::now().to_rfc3339(),
            request,
            state: state_label(request.state_code),
            consumption_type: type_label(request.consumption_code),
            prediction,
            projection,
        }
    }

    /// Sum of the projected months.
    pub fn projected_total(&self) -> f64 {
        self.projection.iter().map(|p| p.value).sum()
    }
}

fn state_label(code: u8) -> String {
    states::find_state_by_code(code)
        .map(|s| format!("{} ({})", s.name, s.uf))
        .unwrap_or_else(|| format!("#{}", code))
}

fn type_label(code: u8) -> String {
    ConsumptionType::from_code(code)
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| format!("#{}", code))
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

pub fn print_prediction(report: &ForecastReport) {
    let r = &report.request;
    println!("=== Prediction ===");
    println!("State:            {}", report.state);
    println!("Consumption type: {}", report.consumption_type);
    println!("Month:            {}-{:02}", r.year, r.month);
    println!("Consumers:        {}", r.consumers);
    println!("Predicted:        {:.2} MWh", report.prediction);
}

pub fn print_projection(report: &ForecastReport) {
    if report.projection.is_empty() {
        return;
    }
    println!("=== Projection: next {} months ===", report.projection.len());
    for point in &report.projection {
        println!("  {}  {:>14.2} MWh", point.date.format("%Y-%m"), point.value);
    }
    println!("  {:<7}  {:>14.2} MWh", "total", report.projected_total());
}

pub fn print_dataset_summary(dataset: &Dataset) {
    println!("=== Dataset ===");
    println!("Rows: {} ({} skipped)", dataset.len(), dataset.skipped);
    if let Some((first, last)) = dataset.year_range() {
        println!("Years: {}..={}", first, last);
    }

    println!("Consumption per year:");
    for (year, total) in dataset.annual_totals() {
        println!("  {}  {:>16.2}", year, total);
    }

    println!("Mean consumption per month:");
    for (month, mean) in dataset.monthly_means() {
        println!("  {:>2}  {:>16.2}", month, mean);
    }

    println!("Consumption per state:");
    for (state, total) in state_breakdown(dataset) {
        println!("  {:<28}  {:>16.2}", state, total);
    }
}

/// Per-state totals labelled with the state name, largest first.
pub fn state_breakdown(dataset: &Dataset) -> Vec<(String, f64)> {
    let mut rows: Vec<_> = dataset
        .state_totals()
        .into_iter()
        .map(|(code, total)| (state_label(code), total))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    rows
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Writes the projection as `date,value` rows.
pub fn export_projection_csv(points: &[ProjectionPoint], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for point in points {
        writer.serialize(point).map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the whole report as pretty-printed JSON.
pub fn export_report_json(report: &ForecastReport, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| ForecastError::Io(std::io::Error::other(e)))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Standard file names inside the output directory.
pub struct OutputPaths {
    pub prediction_chart: PathBuf,
    pub projection_chart: PathBuf,
    pub projection_csv: PathBuf,
    pub report_json: PathBuf,
    pub dataset_scatter: PathBuf,
    pub annual_bars: PathBuf,
    pub monthly_line: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        OutputPaths {
            prediction_chart: dir.join("prediction.svg"),
            projection_chart: dir.join("projection.svg"),
            projection_csv: dir.join("projection.csv"),
            report_json: dir.join("report.json"),
            dataset_scatter: dir.join("dataset_scatter.svg"),
            annual_bars: dir.join("dataset_annual.svg"),
            monthly_line: dir.join("dataset_monthly.svg"),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn csv_err(e: csv::Error) -> ForecastError {
    ForecastError::Io(std::io::Error::other(e))
}
