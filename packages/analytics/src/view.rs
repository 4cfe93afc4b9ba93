//! View construction: aggregation output to renderer-agnostic view data.
//!
//! The structures here are what the choropleth and bar renderers consume.
//! They carry no rendering detail beyond display rounding and the bar
//! shading fraction; everything else (colors, projection, layout) belongs
//! to the frontend.

use burglary_map_models::{Dataset, DistrictAggregate, FilterState, Metric};
use serde::Serialize;

use crate::{Aggregation, aggregate, average_metric, filter, top_ranked};

/// Sentinel shown when the filtered subset is empty.
pub const NO_DATA: &str = "N/A";

/// Coloring input for one district on the choropleth map, keyed by the
/// exact district string used in the boundary document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethEntry {
    /// District key, matching the boundary feature property.
    pub district: String,
    /// Value of the selected metric, drives the coloring.
    pub value: f64,
    /// Tooltip field: summed incident count.
    pub total_incidents: u64,
    /// Tooltip field: mean rate per 1000.
    pub rate_per_1000: f64,
}

/// One bar of the ranked chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarEntry {
    /// District display name.
    pub district: String,
    /// Display value: the rate rounded to 0 decimals, or the raw total.
    pub display_value: f64,
    /// Bar shading as a fraction of the ranked maximum, in `[0, 1]`.
    pub color_fraction: f64,
    /// Tooltip field: summed incident count.
    pub total_incidents: u64,
    /// Tooltip field: mean rate per 1000.
    pub rate_per_1000: f64,
}

/// Horizontal reference line at the all-district average.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageLine {
    /// Unweighted mean of the metric across all districts in the
    /// aggregation, not just the ranked top entries.
    pub value: f64,
    /// Annotation text, e.g. `"Average 2009 - 2023: 57"`.
    pub label: String,
}

/// Plain-text fields for the three info cards and the dynamic title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// E.g. `"12,345 burglaries"`.
    pub total_incidents_text: String,
    /// E.g. `"41.27% of total burglaries"`.
    pub percentage_text: String,
    /// Safest district name, or `"N/A"` for an empty subset.
    pub safest_district: String,
    /// Most vulnerable district name, or `"N/A"` for an empty subset.
    pub most_vulnerable_district: String,
    /// `"📌 Burglaries in 2020"` for a single year, otherwise
    /// `"⛓️ Burglaries between 2009 - 2023"`.
    pub title: String,
}

/// Everything the dashboard renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// The metric the view was computed for.
    pub metric: Metric,
    /// Axis/colorbar label for the metric.
    pub metric_label: String,
    /// Per-district coloring values for the map.
    pub choropleth: Vec<ChoroplethEntry>,
    /// Ranked top districts for the bar chart, descending.
    pub bars: Vec<BarEntry>,
    /// Average reference line; absent with fewer than 2 districts.
    pub average_line: Option<AverageLine>,
    /// Info card texts and the dynamic title.
    pub summary: Summary,
}

/// Computes the full dashboard view for one filter state.
///
/// This is the single pure entry point behind every interaction: filter,
/// aggregate, build view, no caching and no incremental update.
#[must_use]
pub fn compute_view(dataset: &Dataset, state: &FilterState, metric: Metric) -> DashboardView {
    let subset = filter(dataset, state);
    let aggregation = aggregate(&subset, metric, dataset.total_incidents_all_years());

    let choropleth = aggregation
        .districts
        .iter()
        .map(|agg| ChoroplethEntry {
            district: agg.district.clone(),
            value: agg.metric_value(metric),
            total_incidents: agg.sum_incidents,
            rate_per_1000: agg.mean_rate,
        })
        .collect();

    let bars = build_bars(&aggregation.districts, metric);
    let average_line = average_metric(&aggregation.districts, metric).map(|value| AverageLine {
        value,
        label: format!(
            "Average {} - {}: {value:.0}",
            state.year_range.0, state.year_range.1
        ),
    });

    let summary = build_summary(&aggregation, state.year_range);

    DashboardView {
        metric,
        metric_label: metric.label().to_string(),
        choropleth,
        bars,
        average_line,
        summary,
    }
}

/// Ranks, truncates, and decorates the bar entries with display values and
/// shading fractions.
fn build_bars(districts: &[DistrictAggregate], metric: Metric) -> Vec<BarEntry> {
    let ranked = top_ranked(districts, metric);
    let max_value = ranked
        .first()
        .map_or(0.0, |leader| leader.metric_value(metric));

    ranked
        .into_iter()
        .map(|agg| {
            let value = agg.metric_value(metric);
            let display_value = match metric {
                Metric::Rate => round_half_even(value),
                Metric::Total => value,
            };
            let color_fraction = if max_value > 0.0 {
                value / max_value
            } else {
                0.0
            };
            BarEntry {
                district: agg.district,
                display_value,
                color_fraction,
                total_incidents: agg.sum_incidents,
                rate_per_1000: agg.mean_rate,
            }
        })
        .collect()
}

fn build_summary(aggregation: &Aggregation, year_range: (i32, i32)) -> Summary {
    let (from, to) = year_range;
    let title = if from == to {
        format!("📌 Burglaries in {from}")
    } else {
        format!("⛓️ Burglaries between {from} - {to}")
    };

    Summary {
        total_incidents_text: format!(
            "{} burglaries",
            format_thousands(aggregation.total_incidents)
        ),
        percentage_text: format!(
            "{:.2}% of total burglaries",
            aggregation.percentage_of_all_time
        ),
        safest_district: aggregation
            .safest_district
            .clone()
            .unwrap_or_else(|| NO_DATA.to_string()),
        most_vulnerable_district: aggregation
            .most_vulnerable_district
            .clone()
            .unwrap_or_else(|| NO_DATA.to_string()),
        title,
    }
}

/// Rounds to the nearest integer with ties going to the even neighbor,
/// the same convention `format!("{:.0}")` uses. Plain `f64::round` would
/// put an exact `.5` one higher.
fn round_half_even(value: f64) -> f64 {
    let floor = value.floor();
    if (value - floor - 0.5).abs() < f64::EPSILON {
        if floor.rem_euclid(2.0) < f64::EPSILON {
            floor
        } else {
            floor + 1.0
        }
    } else {
        value.round()
    }
}

/// Formats an integer with `,` thousands separators.
#[must_use]
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
