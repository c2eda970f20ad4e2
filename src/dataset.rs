//! Historical consumption dataset.
//!
//! The CSV the model was trained on, loaded read-only for the exploratory
//! views. Expected columns:
//!
//! | column     | meaning                                   |
//! |------------|-------------------------------------------|
//! | `ano`      | year                                      |
//! | `mes`      | month, 1..=12                             |
//! | `sigla_uf` | state feature code, see `states`          |
//! | `consumo`  | consumption in MWh                        |
//!
//! Extra columns are ignored. Loading is best-effort: rows that do not
//! deserialize, or carry a month outside 1..=12, are skipped and counted.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logging::{self, Component};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "sigla_uf")]
    pub state_code: u8,
    #[serde(rename = "consumo")]
    pub consumption: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<ConsumptionRecord>,
    /// Rows dropped during loading.
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Reads the dataset from disk.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| DatasetError::Io(format!("{}: {}", path.display(), e)))?;
    let subject = path.display().to_string();
    load_from_reader(file, &subject)
}

/// Reads the dataset from any CSV source. `subject` names the source in logs.
pub fn load_from_reader<R: Read>(reader: R, subject: &str) -> Result<Dataset, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DatasetError::Csv(e.to_string()))?
        .clone();
    for required in ["ano", "mes", "sigla_uf", "consumo"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn(required.to_string()));
        }
    }

    let mut dataset = Dataset::default();
    let mut total = 0;

    for (i, row) in rdr.deserialize::<ConsumptionRecord>().enumerate() {
        total += 1;
        match row {
            Ok(record) if (1..=12).contains(&record.month) && record.consumption.is_finite() => {
                dataset.records.push(record)
            }
            Ok(record) => {
                dataset.skipped += 1;
                logging::debug(
                    Component::Dataset,
                    Some(subject),
                    &format!("row {} skipped: out-of-domain values {:?}", i + 2, record),
                );
            }
            Err(e) => {
                dataset.skipped += 1;
                logging::debug(
                    Component::Dataset,
                    Some(subject),
                    &format!("row {} skipped: {}", i + 2, e),
                );
            }
        }
    }

    logging::log_load_summary(subject, total, dataset.records.len(), dataset.skipped);

    if total > 0 && dataset.records.is_empty() {
        return Err(DatasetError::NoValidRows { skipped: dataset.skipped });
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows of a single state.
    pub fn for_state(&self, state_code: u8) -> Dataset {
        Dataset {
            records: self
                .records
                .iter()
                .filter(|r| r.state_code == state_code)
                .cloned()
                .collect(),
            skipped: 0,
        }
    }

    /// Total consumption per year.
    pub fn annual_totals(&self) -> BTreeMap<i32, f64> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            *totals.entry(r.year).or_insert(0.0) += r.consumption;
        }
        totals
    }

    /// Total consumption per (year, month).
    pub fn year_month_totals(&self) -> BTreeMap<(i32, u32), f64> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            *totals.entry((r.year, r.month)).or_insert(0.0) += r.consumption;
        }
        totals
    }

    /// Mean row consumption per calendar month, across all years and states.
    pub fn monthly_means(&self) -> BTreeMap<u32, f64> {
        let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for r in &self.records {
            let entry = sums.entry(r.month).or_insert((0.0, 0));
            entry.0 += r.consumption;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(month, (sum, n))| (month, sum / n as f64))
            .collect()
    }

    /// Total consumption per state code.
    pub fn state_totals(&self) -> BTreeMap<u8, f64> {
        let mut totals = BTreeMap::new();
        for r in &self.records {
            *totals.entry(r.state_code).or_insert(0.0) += r.consumption;
        }
        totals
    }

    /// `(year, consumption, month)` for every row, for the scatter view.
    pub fn scatter_points(&self) -> Vec<(i32, f64, u32)> {
        self.records
            .iter()
            .map(|r| (r.year, r.consumption, r.month))
            .collect()
    }

    /// First and last year present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    pub fn consumption_range(&self) -> Option<(f64, f64)> {
        if self.records.is_empty() {
            return None;
        }
        let min = self.records.iter().map(|r| r.consumption).fold(f64::INFINITY, f64::min);
        let max = self.records.iter().map(|r| r.consumption).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// The file could not be opened or read.
    Io(String),
    /// The header row could not be read.
    Csv(String),
    /// A required column is absent from the header.
    MissingColumn(String),
    /// Every data row was rejected.
    NoValidRows { skipped: usize },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(msg) => write!(f, "cannot read dataset: {}", msg),
            DatasetError::Csv(msg) => write!(f, "malformed CSV: {}", msg),
            DatasetError::MissingColumn(col) => write!(f, "missing column '{}'", col),
            DatasetError::NoValidRows { skipped } => {
                write!(f, "no valid rows ({} skipped)", skipped)
            }
        }
    }
}

impl std::error::Error for DatasetError {}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ano,mes,sigla_uf,tipo_consumo,consumo
2004,1,20,3,100.0
2004,2,20,3,200.0
2005,1,20,3,300.0
2005,1,16,3,50.0
";

    fn load(csv: &str) -> Result<Dataset, DatasetError> {
        load_from_reader(csv.as_bytes(), "test")
    }

    #[test]
    fn test_loads_all_well_formed_rows() {
        let ds = load(SAMPLE).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.skipped, 0);
        assert_eq!(
            ds.records[0],
            ConsumptionRecord {
                year: 2004,
                month: 1,
                state_code: 20,
                consumption: 100.0
            }
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_counted() {
        let csv = "\
ano,mes,sigla_uf,consumo
2004,1,20,100.0
2004,13,20,100.0
abc,1,20,100.0
2004,2,20,
2004,3,20,50.5
";
        let ds = load(csv).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.skipped, 3);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let err = load("ano,mes,consumo\n2004,1,10\n").unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("sigla_uf".to_string()));
    }

    #[test]
    fn test_padded_header_and_fields_are_trimmed() {
        let ds = load("ano, mes, sigla_uf, consumo\n2004, 1, 20, 100.0\n").unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.skipped, 0);
        assert_eq!(ds.records[0].state_code, 20);
    }

    #[test]
    fn test_all_rows_invalid_is_an_error() {
        let err = load("ano,mes,sigla_uf,consumo\nx,y,z,w\n").unwrap_err();
        assert_eq!(err, DatasetError::NoValidRows { skipped: 1 });
    }

    #[test]
    fn test_header_only_file_is_an_empty_dataset() {
        let ds = load("ano,mes,sigla_uf,consumo\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.year_range(), None);
        assert_eq!(ds.consumption_range(), None);
    }

    #[test]
    fn test_annual_totals() {
        let totals = load(SAMPLE).unwrap().annual_totals();
        assert_eq!(totals.get(&2004), Some(&300.0));
        assert_eq!(totals.get(&2005), Some(&350.0));
    }

    #[test]
    fn test_monthly_means() {
        let means = load(SAMPLE).unwrap().monthly_means();
        assert_eq!(means.get(&1), Some(&150.0)); // (100 + 300 + 50) / 3
        assert_eq!(means.get(&2), Some(&200.0));
        assert_eq!(means.len(), 2);
    }

    #[test]
    fn test_year_month_totals_and_state_totals() {
        let ds = load(SAMPLE).unwrap();
        assert_eq!(ds.year_month_totals().get(&(2005, 1)), Some(&350.0));
        assert_eq!(ds.state_totals().get(&16), Some(&50.0));
        assert_eq!(ds.state_totals().get(&20), Some(&600.0));
    }

    #[test]
    fn test_for_state_filters_rows() {
        let sp = load(SAMPLE).unwrap().for_state(20);
        assert_eq!(sp.len(), 3);
        assert!(sp.records.iter().all(|r| r.state_code == 20));
    }

    #[test]
    fn test_ranges_and_scatter_points() {
        let ds = load(SAMPLE).unwrap();
        assert_eq!(ds.year_range(), Some((2004, 2005)));
        assert_eq!(ds.consumption_range(), Some((50.0, 300.0)));
        assert_eq!(ds.scatter_points()[1], (2004, 200.0, 2));
    }
}
