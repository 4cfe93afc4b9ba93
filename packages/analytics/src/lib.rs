#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure computation pipeline for the burglary map.
//!
//! Every user interaction recomputes the dashboard from scratch:
//! [`filter`] selects the records inside the year window and district
//! selection, [`aggregate`] groups them per district, and
//! [`view::compute_view`] turns the aggregation into renderer-agnostic
//! view data. Nothing here touches I/O or mutates the dataset, so the
//! whole pipeline is callable from any UI layer and unit-testable
//! without a server.

pub mod view;

use std::collections::HashMap;

use burglary_map_models::{BurglaryRecord, Dataset, DistrictAggregate, FilterState, Metric, district};

pub use view::{AverageLine, BarEntry, ChoroplethEntry, DashboardView, Summary, compute_view};

/// Number of entries in the ranked bar chart. Fixed for chart readability,
/// not user-configurable.
pub const TOP_N: usize = 12;

/// Selects the records inside the filter's year window and district
/// selection. Borrows from the dataset; never mutates or copies it.
#[must_use]
pub fn filter<'a>(dataset: &'a Dataset, state: &FilterState) -> Vec<&'a BurglaryRecord> {
    dataset
        .records()
        .iter()
        .filter(|record| state.includes(record))
        .collect()
}

/// The result of aggregating a filtered subset.
///
/// Extremes are `None` for an empty subset; the view builder renders that
/// as the "N/A" sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// One aggregate per district, in canonical district order.
    pub districts: Vec<DistrictAggregate>,
    /// District with the minimum mean value of the selected metric's column.
    pub safest_district: Option<String>,
    /// District with the maximum mean value of the selected metric's column.
    pub most_vulnerable_district: Option<String>,
    /// Sum of `total_incidents` over the subset.
    pub total_incidents: u64,
    /// `total_incidents` as a percentage of the all-time total, in
    /// `[0, 100]`. Zero when the all-time total is zero.
    pub percentage_of_all_time: f64,
}

/// Groups the filtered subset by district and derives the ranked extremes
/// and totals.
///
/// The safest / most vulnerable extremes compare the mean of the selected
/// metric's column per group: the mean rate, or the mean of the yearly
/// incident counts. The per-district sum is what ranking and coloring use
/// for the total metric.
///
/// Group iteration, and therefore min/max tie-breaking, follows the
/// canonical district order (see [`district::natural_cmp`]): on a tie the
/// first district in that order wins.
#[must_use]
pub fn aggregate(
    subset: &[&BurglaryRecord],
    metric: Metric,
    total_incidents_all_years: u64,
) -> Aggregation {
    struct Group {
        sum_incidents: u64,
        rate_sum: f64,
        rows: u32,
    }

    let mut groups: HashMap<&str, Group> = HashMap::new();
    let mut total_incidents: u64 = 0;

    for record in subset {
        total_incidents += record.total_incidents;
        let group = groups.entry(record.district.as_str()).or_insert(Group {
            sum_incidents: 0,
            rate_sum: 0.0,
            rows: 0,
        });
        group.sum_incidents += record.total_incidents;
        group.rate_sum += record.rate_per_1000;
        group.rows += 1;
    }

    // Extremes compare the mean of the selected metric's column per group.
    // For totals that is the mean of the yearly counts, not their sum;
    // the two rankings disagree when districts cover unequal year counts
    // (possible via the merge drop rule). Ranking and coloring keep the sum.
    #[allow(clippy::cast_precision_loss)]
    let mut districts: Vec<(DistrictAggregate, f64)> = groups
        .into_iter()
        .map(|(name, group)| {
            let rows = f64::from(group.rows);
            let mean_incidents = group.sum_incidents as f64 / rows;
            let agg = DistrictAggregate {
                district: name.to_string(),
                sum_incidents: group.sum_incidents,
                mean_rate: group.rate_sum / rows,
            };
            let mean_value = match metric {
                Metric::Rate => agg.mean_rate,
                Metric::Total => mean_incidents,
            };
            (agg, mean_value)
        })
        .collect();
    districts.sort_by(|a, b| district::natural_cmp(&a.0.district, &b.0.district));

    // Strict comparisons keep the first district in canonical order on ties.
    let mut safest: Option<(&str, f64)> = None;
    let mut most_vulnerable: Option<(&str, f64)> = None;
    for (agg, mean_value) in &districts {
        if safest.is_none_or(|(_, best)| *mean_value < best) {
            safest = Some((agg.district.as_str(), *mean_value));
        }
        if most_vulnerable.is_none_or(|(_, worst)| *mean_value > worst) {
            most_vulnerable = Some((agg.district.as_str(), *mean_value));
        }
    }
    let safest_district = safest.map(|(name, _)| name.to_string());
    let most_vulnerable_district = most_vulnerable.map(|(name, _)| name.to_string());

    let districts: Vec<DistrictAggregate> = districts.into_iter().map(|(agg, _)| agg).collect();

    let percentage_of_all_time = if total_incidents_all_years == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let pct = total_incidents as f64 / total_incidents_all_years as f64 * 100.0;
        pct
    };

    Aggregation {
        districts,
        safest_district,
        most_vulnerable_district,
        total_incidents,
        percentage_of_all_time,
    }
}

/// Ranks aggregates descending by the selected metric and truncates to
/// [`TOP_N`]. Ties keep canonical district order (the sort is stable).
#[must_use]
pub fn top_ranked(districts: &[DistrictAggregate], metric: Metric) -> Vec<DistrictAggregate> {
    let mut ranked: Vec<DistrictAggregate> = districts.to_vec();
    ranked.sort_by(|a, b| {
        b.metric_value(metric)
            .partial_cmp(&a.metric_value(metric))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(TOP_N);
    ranked
}

/// Unweighted mean of the selected metric across all districts, or `None`
/// when fewer than 2 districts are present (no reference line is drawn
/// for a single district).
#[must_use]
pub fn average_metric(districts: &[DistrictAggregate], metric: Metric) -> Option<f64> {
    if districts.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = districts.len() as f64;
    let sum: f64 = districts.iter().map(|a| a.metric_value(metric)).sum();
    Some(sum / count)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn record(district: &str, year: i32, incidents: u64, population: f64) -> BurglaryRecord {
        BurglaryRecord {
            district: district.to_string(),
            year,
            total_incidents: incidents,
            population,
            rate_per_1000: incidents as f64 / population * 1000.0,
        }
    }

    fn single_district_dataset() -> Dataset {
        Dataset::new(vec![
            record("A", 2010, 10, 1000.0),
            record("A", 2011, 20, 1000.0),
            record("A", 2012, 30, 1000.0),
        ])
    }

    #[test]
    fn filter_respects_year_bounds() {
        let dataset = single_district_dataset();
        let state = FilterState::new(2011, 2012, BTreeSet::new());
        let subset = filter(&dataset, &state);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| (2011..=2012).contains(&r.year)));
    }

    #[test]
    fn empty_selection_equals_full_selection() {
        let dataset = Dataset::new(vec![
            record("A", 2020, 10, 1000.0),
            record("B", 2020, 5, 1000.0),
        ]);
        let all = filter(&dataset, &FilterState::new(2020, 2020, BTreeSet::new()));
        let explicit = filter(
            &dataset,
            &FilterState::new(
                2020,
                2020,
                BTreeSet::from(["A".to_string(), "B".to_string()]),
            ),
        );
        assert_eq!(all, explicit);
    }

    #[test]
    fn filter_does_not_mutate_dataset() {
        let dataset = single_district_dataset();
        let before = dataset.records().to_vec();
        let _ = filter(&dataset, &FilterState::new(2011, 2011, BTreeSet::new()));
        assert_eq!(dataset.records(), before.as_slice());
    }

    #[test]
    fn single_district_scenario() {
        // Incidents [10, 20, 30] over 2010-2012, population 1000 each year.
        let dataset = single_district_dataset();
        for (record, expected) in dataset.records().iter().zip([10.0, 20.0, 30.0]) {
            assert!((record.rate_per_1000 - expected).abs() < f64::EPSILON);
        }

        let subset = filter(&dataset, &FilterState::new(2010, 2012, BTreeSet::new()));
        assert_eq!(subset.len(), 3);

        let agg = aggregate(&subset, Metric::Rate, dataset.total_incidents_all_years());
        assert_eq!(agg.safest_district.as_deref(), Some("A"));
        assert_eq!(agg.most_vulnerable_district.as_deref(), Some("A"));
        assert_eq!(agg.districts.len(), 1);
        assert_eq!(agg.districts[0].sum_incidents, 60);
        assert!((agg.districts[0].mean_rate - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_district_extremes() {
        // A: 10 incidents / 1000, B: 5 incidents / 1000, both in 2020.
        let dataset = Dataset::new(vec![
            record("A", 2020, 10, 1000.0),
            record("B", 2020, 5, 1000.0),
        ]);
        let subset = filter(&dataset, &FilterState::new(2020, 2020, BTreeSet::new()));
        let agg = aggregate(&subset, Metric::Rate, dataset.total_incidents_all_years());
        assert_eq!(agg.safest_district.as_deref(), Some("B"));
        assert_eq!(agg.most_vulnerable_district.as_deref(), Some("A"));
    }

    #[test]
    fn total_extremes_use_mean_of_yearly_counts() {
        // A: totals [6, 6] over 2020-2021 (mean 6, sum 12); B: [10] in
        // 2020 only (mean 10, sum 10). The extremes follow the means, so
        // A is safest despite the larger sum; ranking keeps the sum.
        let dataset = Dataset::new(vec![
            record("A", 2020, 6, 1000.0),
            record("A", 2021, 6, 1000.0),
            record("B", 2020, 10, 1000.0),
        ]);
        let subset = filter(&dataset, &FilterState::new(2020, 2021, BTreeSet::new()));
        let agg = aggregate(&subset, Metric::Total, dataset.total_incidents_all_years());

        assert_eq!(agg.safest_district.as_deref(), Some("A"));
        assert_eq!(agg.most_vulnerable_district.as_deref(), Some("B"));

        let ranked = top_ranked(&agg.districts, Metric::Total);
        assert_eq!(ranked[0].district, "A");
        assert_eq!(ranked[0].sum_incidents, 12);
    }

    #[test]
    fn tie_break_takes_first_in_canonical_order() {
        let dataset = Dataset::new(vec![
            record("Kreis 10", 2020, 5, 1000.0),
            record("Kreis 2", 2020, 5, 1000.0),
        ]);
        let subset = filter(&dataset, &FilterState::new(2020, 2020, BTreeSet::new()));
        let agg = aggregate(&subset, Metric::Rate, dataset.total_incidents_all_years());
        assert_eq!(agg.safest_district.as_deref(), Some("Kreis 2"));
        assert_eq!(agg.most_vulnerable_district.as_deref(), Some("Kreis 2"));
    }

    #[test]
    fn district_sums_agree_with_subset_total() {
        let dataset = Dataset::new(vec![
            record("A", 2020, 10, 1000.0),
            record("A", 2021, 7, 1000.0),
            record("B", 2020, 5, 1000.0),
        ]);
        let subset = filter(&dataset, &FilterState::new(2020, 2021, BTreeSet::new()));
        let agg = aggregate(&subset, Metric::Total, dataset.total_incidents_all_years());
        let per_district: u64 = agg.districts.iter().map(|a| a.sum_incidents).sum();
        assert_eq!(per_district, agg.total_incidents);
        assert_eq!(agg.total_incidents, 22);
    }

    #[test]
    fn percentage_is_bounded_and_exact_for_full_dataset() {
        let dataset = Dataset::new(vec![
            record("A", 2020, 10, 1000.0),
            record("B", 2021, 5, 1000.0),
        ]);

        let full = filter(&dataset, &FilterState::new(2020, 2021, BTreeSet::new()));
        let agg = aggregate(&full, Metric::Rate, dataset.total_incidents_all_years());
        assert!((agg.percentage_of_all_time - 100.0).abs() < f64::EPSILON);

        let partial = filter(&dataset, &FilterState::new(2020, 2020, BTreeSet::new()));
        let agg = aggregate(&partial, Metric::Rate, dataset.total_incidents_all_years());
        assert!(agg.percentage_of_all_time >= 0.0);
        assert!(agg.percentage_of_all_time <= 100.0);
    }

    #[test]
    fn zero_all_time_total_yields_zero_percentage() {
        let agg = aggregate(&[], Metric::Rate, 0);
        assert!((agg.percentage_of_all_time - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_subset_has_no_extremes() {
        let agg = aggregate(&[], Metric::Rate, 100);
        assert_eq!(agg.safest_district, None);
        assert_eq!(agg.most_vulnerable_district, None);
        assert_eq!(agg.total_incidents, 0);
        assert!(agg.districts.is_empty());
    }

    #[test]
    fn top_ranked_truncates_and_sorts_descending() {
        let records: Vec<BurglaryRecord> = (1..=15)
            .map(|i| record(&format!("Kreis {i}"), 2020, i, 1000.0))
            .collect();
        let dataset = Dataset::new(records);
        let subset = filter(&dataset, &FilterState::new(2020, 2020, BTreeSet::new()));
        let agg = aggregate(&subset, Metric::Total, dataset.total_incidents_all_years());

        let ranked = top_ranked(&agg.districts, Metric::Total);
        assert_eq!(ranked.len(), TOP_N);
        for pair in ranked.windows(2) {
            assert!(pair[0].metric_value(Metric::Total) >= pair[1].metric_value(Metric::Total));
        }
        assert_eq!(ranked[0].district, "Kreis 15");
    }

    #[test]
    fn average_requires_two_districts() {
        let one = vec![DistrictAggregate {
            district: "A".to_string(),
            sum_incidents: 10,
            mean_rate: 10.0,
        }];
        assert_eq!(average_metric(&one, Metric::Rate), None);
        assert_eq!(average_metric(&[], Metric::Rate), None);

        let two = vec![
            DistrictAggregate {
                district: "A".to_string(),
                sum_incidents: 10,
                mean_rate: 10.0,
            },
            DistrictAggregate {
                district: "B".to_string(),
                sum_incidents: 5,
                mean_rate: 5.0,
            },
        ];
        let avg = average_metric(&two, Metric::Rate).unwrap();
        assert!((avg - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn average_covers_all_districts_not_just_top_n() {
        let records: Vec<BurglaryRecord> = (1..=14)
            .map(|i| record(&format!("Kreis {i}"), 2020, i, 1000.0))
            .collect();
        let dataset = Dataset::new(records);
        let subset = filter(&dataset, &FilterState::new(2020, 2020, BTreeSet::new()));
        let agg = aggregate(&subset, Metric::Total, dataset.total_incidents_all_years());

        // Mean of 1..=14 is 7.5; the top-12 mean would be higher.
        let avg = average_metric(&agg.districts, Metric::Total).unwrap();
        assert!((avg - 7.5).abs() < f64::EPSILON);
    }
}
