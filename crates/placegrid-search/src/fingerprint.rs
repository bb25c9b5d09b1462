//! Cache keys for search criteria.
//!
//! Two logically identical searches must map to the same key even when their
//! coordinates differ by floating-point noise or their type lists are ordered
//! differently.

use placegrid_core::SearchCriteria;

const NO_TYPE_FILTER: &str = "all";
const NO_RATING_FILTER: &str = "any";

/// Round to 4 decimal places (~11 m), rendered without trailing zeros.
fn coordinate(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // -0.0 and 0.0 are the same edge
    format!("{}", rounded + 0.0)
}

/// Normal-form key for `criteria`.
pub fn fingerprint(criteria: &SearchCriteria) -> String {
    let b = &criteria.bounds;

    let mut types: Vec<&str> = criteria.type_filters().iter().map(String::as_str).collect();
    types.sort_unstable();
    types.dedup();
    let types_key = if types.is_empty() {
        NO_TYPE_FILTER.to_string()
    } else {
        types.join(",")
    };

    // One decimal merges e.g. 3.95 and 4.0; callers must only pass ratings
    // from the request layer's fixed set of thresholds.
    let rating_key = criteria
        .min_rating
        .map_or_else(|| NO_RATING_FILTER.to_string(), |r| format!("{r:.1}"));

    format!(
        "places:n{}:s{}:e{}:w{}:t{types_key}:r{rating_key}:max{}",
        coordinate(b.north),
        coordinate(b.south),
        coordinate(b.east),
        coordinate(b.west),
        criteria.max_results,
    )
}
