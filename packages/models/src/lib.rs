#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared domain types for the burglary map.
//!
//! This crate defines the immutable [`Dataset`] built once at startup, the
//! per-request [`FilterState`], and the [`Metric`] selector that drives
//! ranking and coloring everywhere downstream.

pub mod district;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One merged row: a district's burglary figures for a single year.
///
/// Every record has a defined, positive population — rows missing population
/// data are dropped at merge time and never enter a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurglaryRecord {
    /// District display name, matching the boundary document's feature key.
    pub district: String,
    /// Reporting year.
    pub year: i32,
    /// Raw burglary count for this district/year.
    pub total_incidents: u64,
    /// Resident count for this district/year. Always positive.
    pub population: f64,
    /// `total_incidents / population * 1000`, computed once at merge time.
    pub rate_per_1000: f64,
}

/// The full merged dataset, immutable after construction.
///
/// Built once at startup and shared read-only across all requests; every
/// interaction recomputes its view from scratch against these records.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<BurglaryRecord>,
    total_incidents_all_years: u64,
    year_range: Option<(i32, i32)>,
    districts: Vec<String>,
}

impl Dataset {
    /// Builds a dataset from merged records, computing the dataset-wide
    /// constants: the all-time incident total, the year bounds, and the
    /// district list in canonical order (see [`district::natural_cmp`]).
    #[must_use]
    pub fn new(records: Vec<BurglaryRecord>) -> Self {
        let total_incidents_all_years = records.iter().map(|r| r.total_incidents).sum();

        let year_range = records
            .iter()
            .map(|r| r.year)
            .fold(None, |acc: Option<(i32, i32)>, year| match acc {
                None => Some((year, year)),
                Some((min, max)) => Some((min.min(year), max.max(year))),
            });

        let mut districts: Vec<String> = records
            .iter()
            .map(|r| r.district.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        districts.sort_by(|a, b| district::natural_cmp(a, b));

        Self {
            records,
            total_incidents_all_years,
            year_range,
            districts,
        }
    }

    /// All merged records.
    #[must_use]
    pub fn records(&self) -> &[BurglaryRecord] {
        &self.records
    }

    /// Sum of `total_incidents` over the full dataset, used for the
    /// percentage-of-all-time display.
    #[must_use]
    pub const fn total_incidents_all_years(&self) -> u64 {
        self.total_incidents_all_years
    }

    /// `(min_year, max_year)` across the dataset, or `None` when empty.
    #[must_use]
    pub const fn year_range(&self) -> Option<(i32, i32)> {
        self.year_range
    }

    /// Distinct district names in canonical order: ascending by the number
    /// embedded in the name, numberless districts last.
    #[must_use]
    pub fn districts(&self) -> &[String] {
        &self.districts
    }

    /// Distinct years present in the dataset, ascending. Used for slider
    /// marks.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The user-selected measure driving ranking and coloring: the normalized
/// per-1000-residents rate, or the raw incident total.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    /// Burglary rate per 1000 inhabitants, averaged per district.
    #[default]
    Rate,
    /// Total burglaries, summed per district.
    Total,
}

impl Metric {
    /// Human-readable label for chart axes and the colorbar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rate => "Burglary Rate per 1000",
            Self::Total => "Total Burglaries",
        }
    }
}

/// Transient per-request filter values, re-derived from user input on every
/// interaction and passed by value into the pure computation pipeline.
///
/// An empty `selected_districts` set means "no filter" — all districts are
/// included. Selecting zero districts is equivalent to selecting all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive `(from, to)` year window.
    pub year_range: (i32, i32),
    /// Districts to include; empty means all.
    pub selected_districts: BTreeSet<String>,
}

impl FilterState {
    /// Builds a filter state, normalizing an inverted year range by swapping
    /// the bounds.
    #[must_use]
    pub fn new(year_from: i32, year_to: i32, selected_districts: BTreeSet<String>) -> Self {
        let year_range = if year_from <= year_to {
            (year_from, year_to)
        } else {
            (year_to, year_from)
        };
        Self {
            year_range,
            selected_districts,
        }
    }

    /// Returns `true` if the record falls inside the year window and the
    /// district selection.
    #[must_use]
    pub fn includes(&self, record: &BurglaryRecord) -> bool {
        let (from, to) = self.year_range;
        from <= record.year && record.year <= to && self.is_selected(&record.district)
    }

    /// Whether a district counts as selected under this filter. With an
    /// empty selection set, every district is selected.
    #[must_use]
    pub fn is_selected(&self, district: &str) -> bool {
        self.selected_districts.is_empty() || self.selected_districts.contains(district)
    }
}

/// Per-district aggregate for one query: incidents summed and rate averaged
/// over the filtered year window. Discarded after view construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictAggregate {
    /// District display name.
    pub district: String,
    /// `sum(total_incidents)` over the group.
    pub sum_incidents: u64,
    /// `mean(rate_per_1000)` over the group.
    pub mean_rate: f64,
}

impl DistrictAggregate {
    /// The value of the selected metric's column for this aggregate.
    #[must_use]
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Rate => self.mean_rate,
            #[allow(clippy::cast_precision_loss)]
            Metric::Total => self.sum_incidents as f64,
        }
    }
}
