//! Command-line front end.
//!
//! Each subcommand is one independent run: load config, load what it needs,
//! compute, print, write files. Any error aborts the run.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::chart;
use crate::config::Config;
use crate::consumption::{CONSUMPTION_REGISTRY, ConsumptionType};
use crate::dataset;
use crate::logging::{self, Component};
use crate::mapper;
use crate::model::{ForecastError, PredictionRequest, Result};
use crate::oracle::{LinearModel, Oracle};
use crate::projection;
use crate::report::{self, ForecastReport, OutputPaths};
use crate::states::{self, STATE_REGISTRY};

#[derive(Debug, Parser)]
#[command(
    name = "mpcec_forecast",
    about = "Brazilian collective electricity consumption forecasts",
    version
)]
pub struct Cli {
    /// Config file (defaults to $MPCEC_CONFIG or ./mpcec.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict consumption for a single month.
    Predict(SelectionArgs),

    /// Predict the months following the selected one.
    Project(ProjectArgs),

    /// Summarise and chart the historical dataset.
    Explore(ExploreArgs),

    /// List the federative units and their codes.
    States,

    /// List the consumption types and their codes.
    Types,
}

#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// State name ("São Paulo") or UF ("SP").
    #[arg(long)]
    pub state: String,

    /// Consumption type (Total, Cativo, Residencial, Industrial, Comercial, Outros).
    #[arg(long = "type")]
    pub consumption_type: String,

    /// Month to predict, YYYY-MM or YYYY-MM-DD.
    #[arg(long)]
    pub date: String,

    /// Number of consumers.
    #[arg(long, default_value_t = 1)]
    pub consumers: u64,

    /// Skip SVG output.
    #[arg(long)]
    pub no_charts: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Months to project (defaults to forecast.horizon_months).
    #[arg(long)]
    pub months: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct ExploreArgs {
    /// Restrict the views to one state.
    #[arg(long)]
    pub state: Option<String>,

    /// Skip SVG output.
    #[arg(long)]
    pub no_charts: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::States => {
            print_states();
            Ok(())
        }
        Commands::Types => {
            print_types();
            Ok(())
        }
        command => {
            let config = Config::resolve(cli.config.as_deref())?;
            logging::init_logger(
                config.log_level()?,
                config.logging.file.as_deref(),
                config.logging.timestamps,
            );
            let operation = command_name(&command);
            let result = match command {
                Commands::Predict(args) => run_predict(&config, &args),
                Commands::Project(args) => run_project(&config, &args),
                Commands::Explore(args) => run_explore(&config, &args),
                Commands::States | Commands::Types => Ok(()),
            };
            if let Err(e) = &result {
                logging::log_failure(operation, e);
            }
            result
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Predict(_) => "predict",
        Commands::Project(_) => "project",
        Commands::Explore(_) => "explore",
        Commands::States => "states",
        Commands::Types => "types",
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parses `YYYY-MM-DD`, or `YYYY-MM` as the first of the month.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d"))
        .map_err(|_| {
            ForecastError::InvalidInput(format!("'{}' is not YYYY-MM or YYYY-MM-DD", input))
        })
}

/// Turns loosely typed selections into a request, enforcing the date range
/// the selectors offer.
pub fn request_from_selection(config: &Config, args: &SelectionArgs) -> Result<PredictionRequest> {
    let state = states::resolve_state(&args.state)
        .ok_or_else(|| ForecastError::UnknownState(args.state.clone()))?;
    let consumption = ConsumptionType::resolve(&args.consumption_type)
        .ok_or_else(|| ForecastError::UnknownConsumptionType(args.consumption_type.clone()))?;

    let date = parse_date(&args.date)?;
    let (min, max) = (config.forecast.min_year, config.forecast.max_year);
    if date.year() < min || date.year() > max {
        return Err(ForecastError::InvalidInput(format!(
            "date {} is outside {}..={}",
            date, min, max
        )));
    }

    mapper::build_request(state.name, consumption.name(), date, args.consumers)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_predict(config: &Config, args: &SelectionArgs) -> Result<()> {
    let request = request_from_selection(config, args)?;
    let oracle = LinearModel::load(&config.paths.model)?;
    let prediction = oracle.predict_request(&request)?;

    let report = ForecastReport::new(request, prediction, Vec::new());
    report::print_prediction(&report);

    if !args.no_charts {
        let paths = OutputPaths::in_dir(&config.paths.output_dir);
        std::fs::create_dir_all(&config.paths.output_dir)?;
        chart::prediction_chart(&request, prediction, &paths.prediction_chart)?;
    }
    Ok(())
}

fn run_project(config: &Config, args: &ProjectArgs) -> Result<()> {
    let request = request_from_selection(config, &args.selection)?;
    let horizon = args.months.unwrap_or(config.forecast.horizon_months);
    if horizon == 0 || horizon > crate::config::MAX_HORIZON {
        return Err(ForecastError::InvalidInput(format!(
            "--months must be in 1..={}",
            crate::config::MAX_HORIZON
        )));
    }

    let oracle = LinearModel::load(&config.paths.model)?;
    let prediction = oracle.predict_request(&request)?;
    let points = projection::project(&oracle, &request, horizon)?;

    let report = ForecastReport::new(request, prediction, points);
    report::print_prediction(&report);
    report::print_projection(&report);

    let paths = OutputPaths::in_dir(&config.paths.output_dir);
    report::export_projection_csv(&report.projection, &paths.projection_csv)?;
    report::export_report_json(&report, &paths.report_json)?;
    logging::info(
        Component::System,
        None,
        &format!(
            "Exported {} and {}",
            paths.projection_csv.display(),
            paths.report_json.display()
        ),
    );

    if !args.selection.no_charts {
        let title = format!("Projection for the next {} months", horizon);
        chart::prediction_chart(&request, prediction, &paths.prediction_chart)?;
        chart::projection_chart(&report.projection, &title, &paths.projection_chart)?;
    }
    Ok(())
}

fn run_explore(config: &Config, args: &ExploreArgs) -> Result<()> {
    let mut data = dataset::load_dataset(&config.paths.dataset)?;

    if let Some(input) = &args.state {
        let state = states::resolve_state(input)
            .ok_or_else(|| ForecastError::UnknownState(input.clone()))?;
        data = data.for_state(state.code);
        logging::info(
            Component::Dataset,
            Some(state.uf),
            &format!("{} rows for {}", data.len(), state.name),
        );
    }

    report::print_dataset_summary(&data);

    if !args.no_charts {
        let paths = OutputPaths::in_dir(&config.paths.output_dir);
        std::fs::create_dir_all(&config.paths.output_dir)?;
        chart::dataset_scatter(&data, &paths.dataset_scatter)?;
        chart::annual_bar_chart(&data, &paths.annual_bars)?;
        chart::monthly_line_chart(&data, &paths.monthly_line)?;
    }
    Ok(())
}

fn print_states() {
    println!("{:>4}  {:<2}  {:<20}  {}", "code", "UF", "name", "region");
    for s in STATE_REGISTRY {
        println!("{:>4}  {:<2}  {:<20}  {}", s.code, s.uf, s.name, s.region);
    }
}

fn print_types() {
    println!("{:>4}  {}", "code", "name");
    for t in CONSUMPTION_REGISTRY {
        println!("{:>4}  {}", t.code(), t.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(state: &str, kind: &str, date: &str) -> SelectionArgs {
        SelectionArgs {
            state: state.to_string(),
            consumption_type: kind.to_string(),
            date: date.to_string(),
            consumers: 1000,
            no_charts: true,
        }
    }

    #[test]
    fn test_parse_date_accepts_month_and_day_forms() {
        assert_eq!(parse_date("2020-06").unwrap(), NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        assert_eq!(
            parse_date("2020-06-15").unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()
        );
        assert!(parse_date("06/2020").is_err());
        assert!(parse_date("2020-13").is_err());
    }

    #[test]
    fn test_request_from_lenient_selection() {
        let config = Config::default();
        let request = request_from_selection(&config, &selection("sp", "residencial", "2020-06"))
            .expect("UF and lowercase type should resolve");
        assert_eq!(request.features(), [2020.0, 6.0, 20.0, 3.0, 1000.0]);
    }

    #[test]
    fn test_dates_outside_selector_range_are_rejected() {
        let config = Config::default();
        for date in ["2003-12", "2051-01"] {
            let result = request_from_selection(&config, &selection("SP", "Total", date));
            assert!(matches!(result, Err(ForecastError::InvalidInput(_))), "{}", date);
        }
        assert!(request_from_selection(&config, &selection("SP", "Total", "2004-01")).is_ok());
        assert!(request_from_selection(&config, &selection("SP", "Total", "2050-12-31")).is_ok());
    }

    #[test]
    fn test_unknown_selection_is_reported() {
        let config = Config::default();
        let result = request_from_selection(&config, &selection("Atlantis", "Total", "2020-01"));
        assert!(matches!(result, Err(ForecastError::UnknownState(_))));
        let result = request_from_selection(&config, &selection("SP", "Rural", "2020-01"));
        assert!(matches!(result, Err(ForecastError::UnknownConsumptionType(_))));
    }

    #[test]
    fn test_cli_parses_project_command() {
        let cli = Cli::try_parse_from([
            "mpcec_forecast",
            "project",
            "--state",
            "São Paulo",
            "--type",
            "Residencial",
            "--date",
            "2023-11",
            "--consumers",
            "1000",
            "--months",
            "24",
        ])
        .expect("arguments should parse");

        match cli.command {
            Commands::Project(args) => {
                assert_eq!(args.selection.state, "São Paulo");
                assert_eq!(args.selection.consumers, 1000);
                assert_eq!(args.months, Some(24));
                assert!(!args.selection.no_charts);
            }
            other => panic!("expected project, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_commands_need_no_config() {
        assert!(run(Cli { config: None, command: Commands::States }).is_ok());
        assert!(run(Cli { config: None, command: Commands::Types }).is_ok());
    }
}
