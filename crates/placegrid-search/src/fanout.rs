//! Bounded-concurrency fan-out of cell searches.
//!
//! Every cell gets its own task, but a semaphore admits at most
//! `max_parallel` of them to the provider at once; the rest queue. Results are
//! concatenated in completion order, which carries no meaning.

use std::sync::Arc;

use placegrid_core::{GridCell, PlaceRecord, SearchCriteria};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::provider::PlacesProvider;
use crate::worker::search_cell;

/// Everything the fan-out collected.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Places from every completed cell, unordered and not yet deduplicated.
    pub places: Vec<PlaceRecord>,
    pub cells_total: usize,
    /// Cells whose worker ran to completion, including ones that came back empty.
    pub cells_completed: usize,
    /// Whether cancellation fired before every cell completed.
    pub cancelled: bool,
}

/// Search all `cells` with at most `max_parallel` provider calls in flight.
///
/// Once `cancel` fires, queued cells are skipped and in-flight calls are
/// asked to stop; places from cells that already finished are kept.
pub async fn fan_out<P: PlacesProvider>(
    provider: Arc<P>,
    cells: Vec<GridCell>,
    criteria: Arc<SearchCriteria>,
    max_parallel: usize,
    cancel: &CancellationToken,
) -> FanOutReport {
    let cells_total = cells.len();
    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut tasks = JoinSet::new();

    for cell in cells {
        let provider = Arc::clone(&provider);
        let criteria = Arc::clone(&criteria);
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();

        tasks.spawn(async move {
            let _permit = tokio::select! {
                biased;
                () = cancel.cancelled() => return None,
                permit = semaphore.acquire_owned() => permit.ok()?,
            };
            if cancel.is_cancelled() {
                return None;
            }
            let places = search_cell(provider.as_ref(), &cell, &criteria, &cancel).await;
            if cancel.is_cancelled() {
                // The provider call may have been cut short; don't count it.
                return None;
            }
            Some(places)
        });
    }

    let mut report = FanOutReport {
        cells_total,
        ..FanOutReport::default()
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(places)) => {
                report.cells_completed += 1;
                report.places.extend(places);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "grid cell task failed");
            }
        }
    }

    report.cancelled = cancel.is_cancelled() && report.cells_completed < cells_total;
    report
}
