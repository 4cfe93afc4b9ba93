//! HTTP handler functions for the burglary map API.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, web};
use burglary_map_analytics::compute_view;
use burglary_map_models::{Dataset, FilterState, Metric};
use burglary_map_server_models::{
    ApiDashboard, ApiDistrictControl, ApiDistrictState, ApiHealth, ApiMeta, DashboardQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/meta`
///
/// Returns the dataset bounds the UI controls are built from: the year
/// range for the slider and the district controls in canonical order.
pub async fn meta(state: web::Data<AppState>) -> HttpResponse {
    let dataset = &state.dataset;
    let (min_year, max_year) = match dataset.year_range() {
        Some((min, max)) => (Some(min), Some(max)),
        None => (None, None),
    };

    HttpResponse::Ok().json(ApiMeta {
        min_year,
        max_year,
        years: dataset.years(),
        districts: dataset
            .districts()
            .iter()
            .map(|name| ApiDistrictControl::new(name))
            .collect(),
    })
}

/// `GET /api/dashboard`
///
/// Parses the query into a filter state and metric, computes the view, and
/// returns it together with the derived per-district selection flags.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let dataset = &state.dataset;
    let (filter, metric) = filter_from_params(dataset, &params);

    let view = compute_view(dataset, &filter, metric);

    let district_states: Vec<ApiDistrictState> = dataset
        .districts()
        .iter()
        .map(|name| ApiDistrictState {
            name: name.clone(),
            selected: filter.is_selected(name),
        })
        .collect();

    HttpResponse::Ok().json(ApiDashboard {
        view,
        district_states,
    })
}

/// `GET /api/boundaries`
///
/// The raw `GeoJSON` boundary document for the choropleth renderer.
pub async fn boundaries(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.boundaries.document())
}

/// Resolves query parameters against the dataset's bounds.
///
/// Missing year bounds default to the dataset's full range, an unknown or
/// missing metric falls back to the rate, and the district list is parsed
/// from a comma-separated string. Inverted ranges are normalized by
/// [`FilterState::new`]; nothing here errors.
fn filter_from_params(
    dataset: &Dataset,
    params: &DashboardQueryParams,
) -> (FilterState, Metric) {
    let (min_year, max_year) = dataset.year_range().unwrap_or((0, 0));
    let year_from = params.year_from.unwrap_or(min_year);
    let year_to = params.year_to.unwrap_or(max_year);

    let metric = params
        .metric
        .as_deref()
        .and_then(|s| s.trim().parse::<Metric>().ok())
        .unwrap_or_default();

    let districts = parse_district_list(params.districts.as_deref());

    (FilterState::new(year_from, year_to, districts), metric)
}

/// Parses a comma-separated district list, ignoring empty entries.
fn parse_district_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use burglary_map_models::BurglaryRecord;

    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            BurglaryRecord {
                district: "Kreis 1".to_string(),
                year: 2009,
                total_incidents: 10,
                population: 1000.0,
                rate_per_1000: 10.0,
            },
            BurglaryRecord {
                district: "Kreis 2".to_string(),
                year: 2023,
                total_incidents: 5,
                population: 1000.0,
                rate_per_1000: 5.0,
            },
        ])
    }

    #[test]
    fn defaults_cover_full_range_and_rate() {
        let (filter, metric) = filter_from_params(&dataset(), &DashboardQueryParams::default());
        assert_eq!(filter.year_range, (2009, 2023));
        assert!(filter.selected_districts.is_empty());
        assert_eq!(metric, Metric::Rate);
    }

    #[test]
    fn parses_metric_and_districts() {
        let params = DashboardQueryParams {
            year_from: Some(2010),
            year_to: Some(2012),
            metric: Some("total".to_string()),
            districts: Some("Kreis 1, Kreis 2,,".to_string()),
        };
        let (filter, metric) = filter_from_params(&dataset(), &params);
        assert_eq!(metric, Metric::Total);
        assert_eq!(filter.year_range, (2010, 2012));
        assert_eq!(filter.selected_districts.len(), 2);
        assert!(filter.selected_districts.contains("Kreis 1"));
    }

    #[test]
    fn unknown_metric_falls_back_to_rate() {
        let params = DashboardQueryParams {
            metric: Some("severity".to_string()),
            ..DashboardQueryParams::default()
        };
        let (_, metric) = filter_from_params(&dataset(), &params);
        assert_eq!(metric, Metric::Rate);
    }

    #[test]
    fn inverted_range_is_normalized() {
        let params = DashboardQueryParams {
            year_from: Some(2023),
            year_to: Some(2009),
            ..DashboardQueryParams::default()
        };
        let (filter, _) = filter_from_params(&dataset(), &params);
        assert_eq!(filter.year_range, (2009, 2023));
    }

    #[test]
    fn empty_district_param_means_all() {
        assert!(parse_district_list(None).is_empty());
        assert!(parse_district_list(Some("")).is_empty());
        assert!(parse_district_list(Some(" , ,")).is_empty());
    }
}
