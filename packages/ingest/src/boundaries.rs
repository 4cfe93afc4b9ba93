//! Geographic boundary document loading and district-name validation.
//!
//! The choropleth joins tabular districts to boundary features by exact
//! string match on the `bezeichnung` feature property. That coupling is
//! fragile, so startup runs a validation pass that warns about any name
//! present on one side but not the other; a mismatched district renders
//! with no color on the map.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use burglary_map_models::Dataset;
use geojson::GeoJson;

use crate::IngestError;

/// Feature property holding the district display name.
pub const DISTRICT_PROPERTY: &str = "bezeichnung";

/// The parsed boundary document plus the district names found in its
/// features.
#[derive(Debug, Clone)]
pub struct Boundaries {
    document: GeoJson,
    districts: BTreeSet<String>,
}

impl Boundaries {
    /// The full `GeoJSON` document, served verbatim to the map renderer.
    #[must_use]
    pub const fn document(&self) -> &GeoJson {
        &self.document
    }

    /// District names found in the feature properties.
    #[must_use]
    pub const fn districts(&self) -> &BTreeSet<String> {
        &self.districts
    }
}

/// Loads and parses the boundary document.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, is not valid
/// `GeoJSON`, or is not a feature collection.
pub fn load_boundaries(path: &Path) -> Result<Boundaries, IngestError> {
    let raw = fs::read_to_string(path)?;
    parse_boundaries(&raw)
}

/// Parses a boundary document from its raw `GeoJSON` text.
///
/// # Errors
///
/// Returns [`IngestError`] if the text is not a `GeoJSON` feature
/// collection.
pub fn parse_boundaries(raw: &str) -> Result<Boundaries, IngestError> {
    let document: GeoJson = raw.parse()?;

    let GeoJson::FeatureCollection(collection) = &document else {
        return Err(IngestError::Boundary {
            message: "expected a FeatureCollection at the top level".to_string(),
        });
    };

    let districts: BTreeSet<String> = collection
        .features
        .iter()
        .filter_map(|feature| {
            feature
                .properties
                .as_ref()
                .and_then(|props| props.get(DISTRICT_PROPERTY))
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        })
        .collect();

    if districts.is_empty() {
        log::warn!("Boundary document has no features with a '{DISTRICT_PROPERTY}' property");
    }

    Ok(Boundaries {
        document,
        districts,
    })
}

/// Warns about district names that do not line up between the dataset and
/// the boundary document. Returns the number of mismatches found.
pub fn validate_boundaries(dataset: &Dataset, boundaries: &Boundaries) -> usize {
    let mut mismatches = 0;

    for district in dataset.districts() {
        if !boundaries.districts().contains(district) {
            log::warn!(
                "District '{district}' has no boundary feature; it will render uncolored on the map"
            );
            mismatches += 1;
        }
    }

    for district in boundaries.districts() {
        if !dataset.districts().contains(district) {
            log::warn!("Boundary feature '{district}' has no rows in the dataset");
            mismatches += 1;
        }
    }

    mismatches
}
