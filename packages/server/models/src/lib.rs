#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the burglary map server.

use burglary_map_analytics::DashboardView;
use burglary_map_models::district;
use serde::{Deserialize, Serialize};

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// Query parameters for `GET /api/dashboard`.
///
/// All parameters are optional: missing year bounds default to the
/// dataset's full range, a missing metric defaults to the normalized rate,
/// and a missing/empty district list means all districts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Lower year bound, inclusive.
    pub year_from: Option<i32>,
    /// Upper year bound, inclusive.
    pub year_to: Option<i32>,
    /// `"rate"` or `"total"`.
    pub metric: Option<String>,
    /// Comma-separated district names.
    pub districts: Option<String>,
}

/// One district toggle control, in canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistrictControl {
    /// Full district name, the filter key.
    pub name: String,
    /// Short label for the circle button: the district number, or the full
    /// name when it has none.
    pub label: String,
    /// The number embedded in the name, if any.
    pub number: Option<u32>,
}

impl ApiDistrictControl {
    /// Builds the control for a district name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let number = district::district_number(name);
        let label = number.map_or_else(|| name.to_string(), |n| n.to_string());
        Self {
            name: name.to_string(),
            label,
            number,
        }
    }
}

/// `GET /api/meta` response: the bounds the UI controls are built from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// Earliest year in the dataset, if any data exists.
    pub min_year: Option<i32>,
    /// Latest year in the dataset, if any data exists.
    pub max_year: Option<i32>,
    /// Distinct years, ascending: the slider marks.
    pub years: Vec<i32>,
    /// District controls in canonical order.
    pub districts: Vec<ApiDistrictControl>,
}

/// Per-district selection indicator derived from the request's filter
/// state. Never stored server-side; the active styling of a control is a
/// pure function of the filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistrictState {
    /// Full district name.
    pub name: String,
    /// Whether the district counts as selected under the request's filter.
    pub selected: bool,
}

/// `GET /api/dashboard` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// The computed view data.
    #[serde(flatten)]
    pub view: DashboardView,
    /// Selection indicators for every district control.
    pub district_states: Vec<ApiDistrictState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_district_control_uses_number_label() {
        let control = ApiDistrictControl::new("Kreis 10");
        assert_eq!(control.label, "10");
        assert_eq!(control.number, Some(10));
    }

    #[test]
    fn numberless_district_control_keeps_name() {
        let control = ApiDistrictControl::new("Altstadt");
        assert_eq!(control.label, "Altstadt");
        assert_eq!(control.number, None);
    }
}
