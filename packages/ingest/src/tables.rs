//! CSV table loading and the merge & normalize step.
//!
//! Column names follow the Stadt Zürich open data exports: the incidents
//! table carries `Stadtkreis_Name` / `Ausgangsjahr` / `Straftaten_total`,
//! the population table `KreisLang` / `Jahr` / `AnzBestWir`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use burglary_map_models::{BurglaryRecord, Dataset};
use serde::Deserialize;

use crate::IngestError;

/// One row of the incidents table.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentRow {
    /// District display name.
    #[serde(rename = "Stadtkreis_Name")]
    pub district: String,
    /// Reporting year.
    #[serde(rename = "Ausgangsjahr")]
    pub year: i32,
    /// Total burglaries reported for this district/year.
    #[serde(rename = "Straftaten_total")]
    pub total_incidents: u64,
}

/// One row of the population table. Population is optional here: rows with
/// an empty count survive loading and are dropped at merge time.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationRow {
    /// District display name.
    #[serde(rename = "KreisLang")]
    pub district: String,
    /// Reporting year.
    #[serde(rename = "Jahr")]
    pub year: i32,
    /// Resident count, if recorded.
    #[serde(rename = "AnzBestWir")]
    pub population: Option<f64>,
}

/// Required columns for the incidents table.
const INCIDENT_COLUMNS: &[&str] = &["Stadtkreis_Name", "Ausgangsjahr", "Straftaten_total"];

/// Required columns for the population table.
const POPULATION_COLUMNS: &[&str] = &["KreisLang", "Jahr", "AnzBestWir"];

/// Checks that every required column is present in the header row, so a
/// misconfigured input fails with the column name rather than a row-level
/// deserialization error.
fn validate_headers(
    headers: &csv::StringRecord,
    required: &[&str],
    source_label: &str,
) -> Result<(), IngestError> {
    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(IngestError::MissingColumn {
                source_label: source_label.to_string(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Reads incident rows from any reader. Extra columns are ignored.
///
/// # Errors
///
/// Returns [`IngestError`] on malformed CSV or a missing required column.
pub fn read_incidents<R: Read>(reader: R, source_label: &str) -> Result<Vec<IncidentRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    validate_headers(csv_reader.headers()?, INCIDENT_COLUMNS, source_label)?;

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Reads population rows from any reader. Extra columns are ignored.
///
/// # Errors
///
/// Returns [`IngestError`] on malformed CSV or a missing required column.
pub fn read_population<R: Read>(
    reader: R,
    source_label: &str,
) -> Result<Vec<PopulationRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    validate_headers(csv_reader.headers()?, POPULATION_COLUMNS, source_label)?;

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Loads the incidents table from disk.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read or parsed.
pub fn load_incidents(path: &Path) -> Result<Vec<IncidentRow>, IngestError> {
    let file = File::open(path)?;
    let rows = read_incidents(file, &path.display().to_string())?;
    log::info!("Loaded {} incident rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Loads the population table from disk.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read or parsed.
pub fn load_population(path: &Path) -> Result<Vec<PopulationRow>, IngestError> {
    let file = File::open(path)?;
    let rows = read_population(file, &path.display().to_string())?;
    log::info!(
        "Loaded {} population rows from {}",
        rows.len(),
        path.display()
    );
    Ok(rows)
}

/// Joins the two tables on `(district, year)`, favoring incidents, drops
/// rows without a positive population, and computes the per-1000 rate.
///
/// Dropping rows with missing population is the documented filtering rule,
/// not an error; the count is logged for visibility.
#[must_use]
pub fn merge(incidents: Vec<IncidentRow>, population: &[PopulationRow]) -> Dataset {
    let population_by_key: HashMap<(&str, i32), f64> = population
        .iter()
        .filter_map(|row| {
            row.population
                .filter(|p| *p > 0.0)
                .map(|p| ((row.district.as_str(), row.year), p))
        })
        .collect();

    let total_rows = incidents.len();
    let mut records = Vec::with_capacity(total_rows);

    for row in incidents {
        let Some(&population) = population_by_key.get(&(row.district.as_str(), row.year)) else {
            log::debug!(
                "Dropping {} / {}: no population data",
                row.district,
                row.year
            );
            continue;
        };

        #[allow(clippy::cast_precision_loss)]
        let rate_per_1000 = row.total_incidents as f64 / population * 1000.0;

        records.push(BurglaryRecord {
            district: row.district,
            year: row.year,
            total_incidents: row.total_incidents,
            population,
            rate_per_1000,
        });
    }

    let dropped = total_rows - records.len();
    if dropped > 0 {
        log::info!("Dropped {dropped} of {total_rows} incident rows lacking population data");
    }

    Dataset::new(records)
}
