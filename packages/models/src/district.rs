//! Canonical district ordering.
//!
//! Zurich's districts display as "Kreis 1" through "Kreis 12", so lexical
//! sorting would put "Kreis 10" before "Kreis 2". The canonical order used
//! everywhere (UI controls, aggregate group iteration, min/max tie-breaks)
//! is ascending by the number embedded in the name; names without a number
//! sort after all numbered ones, alphabetically among themselves.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Regex matching the number embedded in a district display name.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Extracts the first number embedded in a district display name.
///
/// `"Kreis 10"` yields `Some(10)`; a name with no digits yields `None`.
#[must_use]
pub fn district_number(name: &str) -> Option<u32> {
    NUMBER_RE.find(name).and_then(|m| m.as_str().parse().ok())
}

/// Compares two district names in canonical order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (district_number(a), district_number(b)) {
        (Some(na), Some(nb)) => na.cmp(&nb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
