//! End-to-end tests over the public API, using the fixture artifact and
//! dataset under tests/fixtures.
//!
//! Fixture model: 1000 + 10·ano + 50·mes − 5·sigla_uf − 100·tipo + 0.5·consumidores
//!
//! Run with: cargo test --test forecast_pipeline

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use mpcec_forecast::chart;
use mpcec_forecast::dataset::{self, DatasetError};
use mpcec_forecast::mapper;
use mpcec_forecast::projection::{self, MonthWindow};
use mpcec_forecast::report::{self, ForecastReport, OutputPaths};
use mpcec_forecast::{ForecastError, LinearModel, Oracle, OracleError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn fixture_model() -> LinearModel {
    LinearModel::load(fixture("modelo.json")).expect("fixture model should load")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mpcec_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Single prediction
// ---------------------------------------------------------------------------

#[test]
fn test_sao_paulo_residential_prediction() {
    let request =
        mapper::build_request("São Paulo", "Residencial", ymd(2020, 6, 1), 1000).unwrap();
    assert_eq!(request.features(), [2020.0, 6.0, 20.0, 3.0, 1000.0]);

    // 1000 + 20200 + 300 - 100 - 300 + 500
    let predicted = fixture_model().predict_request(&request).unwrap();
    assert!((predicted - 21600.0).abs() < 1e-9, "got {}", predicted);
}

#[test]
fn test_unknown_state_never_reaches_the_oracle() {
    let result = mapper::build_request("Atlantis", "Residencial", ymd(2020, 6, 1), 1000);
    assert!(matches!(result, Err(ForecastError::UnknownState(ref s)) if s == "Atlantis"));
}

#[test]
fn test_bad_artifact_shape_is_rejected_at_load() {
    let err = LinearModel::load(fixture("modelo_bad_shape.json")).unwrap_err();
    assert_eq!(err, OracleError::Shape { expected: 5, got: 3 });
}

#[test]
fn test_saved_model_loads_back_identically() {
    let dir = scratch_dir("model_save");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("modelo.json");

    let model = fixture_model();
    model.save(&path).unwrap();
    assert_eq!(LinearModel::load(&path).unwrap(), model);
    let _ = std::fs::remove_dir_all(&dir);
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[test]
fn test_twelve_month_projection_from_november() {
    let request =
        mapper::build_request("São Paulo", "Residencial", ymd(2023, 11, 1), 1000).unwrap();
    let points = projection::project(&fixture_model(), &request, 12).unwrap();

    assert_eq!(points.len(), 12);
    let expected_dates: Vec<_> = MonthWindow::after(2023, 11, 12)
        .map(|(y, m)| ymd(y, m, 1))
        .collect();
    let dates: Vec<_> = points.iter().map(|p| p.date).collect();
    assert_eq!(dates, expected_dates);
    assert_eq!(dates[0], ymd(2023, 12, 1));
    assert_eq!(dates[1], ymd(2024, 1, 1));
    assert_eq!(dates[11], ymd(2024, 11, 1));

    // Dec 2023 = 1000 + 20230 + 600 - 100 - 300 + 500
    assert!((points[0].value - 21930.0).abs() < 1e-9);
    // Jan 2024 = 1000 + 20240 + 50 - 100 - 300 + 500
    assert!((points[1].value - 21390.0).abs() < 1e-9);
}

#[test]
fn test_projection_from_december_starts_next_january() {
    let request = mapper::build_request("Bahia", "Total", ymd(2030, 12, 1), 10).unwrap();
    let points = projection::project(&fixture_model(), &request, 12).unwrap();
    assert_eq!(points.len(), 12);
    assert_eq!(points[0].date, ymd(2031, 1, 1));
    assert_eq!(points[11].date, ymd(2031, 12, 1));
}

#[test]
fn test_projection_through_boxed_oracle() {
    let oracle: Box<dyn Oracle> = Box::new(fixture_model());
    let request = mapper::build_request("Acre", "Outros", ymd(2010, 1, 1), 0).unwrap();
    let points = projection::project(oracle.as_ref(), &request, 3).unwrap();
    assert_eq!(points.len(), 3);
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_dataset_loads_best_effort() {
    let ds = dataset::load_dataset(fixture("novos_dados.csv")).unwrap();
    assert_eq!(ds.len(), 8);
    assert_eq!(ds.skipped, 2);
    assert_eq!(ds.year_range(), Some((2004, 2006)));

    let totals = ds.annual_totals();
    assert!((totals[&2004] - 4000.5).abs() < 1e-9);
    assert!((totals[&2005] - 2820.0).abs() < 1e-9);
    assert!((totals[&2006] - 300.0).abs() < 1e-9);

    assert_eq!(ds.for_state(20).len(), 5);
}

#[test]
fn test_missing_dataset_is_an_io_error() {
    let err = dataset::load_dataset(fixture("nope.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Io(_)));
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[test]
fn test_full_run_writes_charts_and_exports() {
    let dir = scratch_dir("outputs");
    std::fs::create_dir_all(&dir).unwrap();
    let paths = OutputPaths::in_dir(&dir);

    let model = fixture_model();
    let request = mapper::build_request("Ceará", "Comercial", ymd(2024, 3, 1), 250).unwrap();
    let prediction = model.predict_request(&request).unwrap();
    let points = projection::project(&model, &request, 12).unwrap();
    let report = ForecastReport::new(request, prediction, points);

    report::export_projection_csv(&report.projection, &paths.projection_csv).unwrap();
    report::export_report_json(&report, &paths.report_json).unwrap();
    chart::prediction_chart(&request, prediction, &paths.prediction_chart).unwrap();
    chart::projection_chart(&report.projection, "Projection", &paths.projection_chart).unwrap();

    let ds = dataset::load_dataset(fixture("novos_dados.csv")).unwrap();
    chart::dataset_scatter(&ds, &paths.dataset_scatter).unwrap();
    chart::annual_bar_chart(&ds, &paths.annual_bars).unwrap();
    chart::monthly_line_chart(&ds, &paths.monthly_line).unwrap();

    for path in [
        &paths.projection_csv,
        &paths.report_json,
        &paths.prediction_chart,
        &paths.projection_chart,
        &paths.dataset_scatter,
        &paths.annual_bars,
        &paths.monthly_line,
    ] {
        let meta = std::fs::metadata(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        assert!(meta.len() > 0, "{} should not be empty", path.display());
    }

    let svg = std::fs::read_to_string(&paths.projection_chart).unwrap();
    assert!(svg.contains("<svg"));

    let csv = std::fs::read_to_string(&paths.projection_csv).unwrap();
    assert_eq!(csv.lines().count(), 13, "header plus 12 months");

    let _ = std::fs::remove_dir_all(&dir);
}
