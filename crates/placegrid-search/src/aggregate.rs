//! Merge per-cell results into one ranked page.

use std::cmp::Ordering;
use std::collections::HashSet;

use placegrid_core::{AggregateResult, PlaceRecord};

/// Deduplicate by place id, rank, and keep the top `max_results`.
///
/// Adjacent cells' search circles overlap, so the same place can arrive more
/// than once; the first copy wins. `total_count` is the unique count before
/// truncation.
pub fn aggregate(records: Vec<PlaceRecord>, max_results: usize) -> AggregateResult {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut unique: Vec<PlaceRecord> = records
        .into_iter()
        .filter(|place| seen.insert(place.place_id.clone()))
        .collect();

    unique.sort_by(rank);
    let total_count = unique.len();
    unique.truncate(max_results);

    AggregateResult {
        places: unique,
        total_count,
    }
}

/// Most-reviewed first, then highest-rated, then place id for a total order.
/// Missing counts and ratings rank as zero.
fn rank(a: &PlaceRecord, b: &PlaceRecord) -> Ordering {
    let count = |p: &PlaceRecord| p.rating_count.unwrap_or(0);
    let rating = |p: &PlaceRecord| p.rating.unwrap_or(0.0);

    count(b)
        .cmp(&count(a))
        .then_with(|| rating(b).total_cmp(&rating(a)))
        .then_with(|| a.place_id.cmp(&b.place_id))
}
