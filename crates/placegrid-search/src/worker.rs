//! Single-cell search with failure containment.

use placegrid_core::{GridCell, PlaceRecord, SearchCriteria};
use tokio_util::sync::CancellationToken;

use crate::provider::{NearbySearchRequest, PlacesProvider, SearchStatus};

/// Flat-earth meters per degree, adequate at cell scale.
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Circle radius covering a cell: half of its longer side in meters.
pub fn cell_radius_meters(cell: &GridCell) -> f64 {
    let max_span = cell.bounds.lat_span().max(cell.bounds.lng_span());
    max_span * METERS_PER_DEGREE / 2.0
}

/// Build the provider request for one cell.
pub fn cell_request(cell: &GridCell, criteria: &SearchCriteria) -> NearbySearchRequest {
    NearbySearchRequest {
        center: cell.bounds.center(),
        radius_meters: cell_radius_meters(cell),
        included_types: criteria.type_filters().to_vec(),
    }
}

/// Search one grid cell and apply the rating filter.
///
/// Never fails: provider errors, error statuses and cancellation all yield an
/// empty list so one bad cell cannot sink the whole search.
pub async fn search_cell<P: PlacesProvider>(
    provider: &P,
    cell: &GridCell,
    criteria: &SearchCriteria,
    cancel: &CancellationToken,
) -> Vec<PlaceRecord> {
    let request = cell_request(cell, criteria);
    let b = &cell.bounds;

    tracing::debug!(
        row = cell.row,
        column = cell.column,
        lat = request.center.lat,
        lng = request.center.lng,
        radius_meters = request.radius_meters,
        "searching grid cell"
    );

    let response = match provider.nearby_search(&request, cancel).await {
        Ok(response) => response,
        Err(err) => {
            if cancel.is_cancelled() {
                tracing::debug!(row = cell.row, column = cell.column, "cell search cancelled");
            } else {
                tracing::warn!(
                    north = b.north,
                    south = b.south,
                    east = b.east,
                    west = b.west,
                    error = %err,
                    "error searching grid cell"
                );
            }
            return Vec::new();
        }
    };

    match response.status {
        SearchStatus::Ok | SearchStatus::ZeroResults => response
            .places
            .into_iter()
            .filter(|place| criteria.accepts_rating(place.rating))
            .collect(),
        SearchStatus::Failed { reason } => {
            tracing::warn!(
                north = b.north,
                south = b.south,
                east = b.east,
                west = b.west,
                reason = %reason,
                "places provider returned an error status for grid cell"
            );
            Vec::new()
        }
    }
}
