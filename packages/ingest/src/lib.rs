#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading, merging, and normalization.
//!
//! Reads the burglary incidents table and the population table from the
//! Stadt Zürich open data CSV exports, joins them on `(district, year)`,
//! drops rows without population data, and computes the per-1000-residents
//! rate. All loading happens once at startup; any missing file or missing
//! required column is fatal.

pub mod boundaries;
pub mod tables;

use std::path::Path;

use burglary_map_models::Dataset;
use thiserror::Error;

/// Errors that can occur while loading and merging the input files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The boundary document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A required column is absent from an input table.
    #[error("Missing required column '{column}' in {source_label}")]
    MissingColumn {
        /// Which input the column was expected in.
        source_label: String,
        /// The missing column name.
        column: String,
    },

    /// The boundary document has an unexpected shape.
    #[error("Boundary document error: {message}")]
    Boundary {
        /// Description of what went wrong.
        message: String,
    },
}

/// Loads both tables from disk and merges them into the immutable
/// [`Dataset`].
///
/// # Errors
///
/// Returns [`IngestError`] if either file cannot be read, a required column
/// is missing, or a row fails to parse.
pub fn load_dataset(
    incidents_path: &Path,
    population_path: &Path,
) -> Result<Dataset, IngestError> {
    let incidents = tables::load_incidents(incidents_path)?;
    let population = tables::load_population(population_path)?;
    Ok(tables::merge(incidents, &population))
}
