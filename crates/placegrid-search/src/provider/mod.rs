//! Upstream places provider contract.
//!
//! The orchestrator only needs one operation from a provider: a bounded-radius
//! "search near a point" call returning normalized [`PlaceRecord`]s.

pub mod google;

use std::future::Future;

use placegrid_core::{LatLng, PlaceRecord};
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;

pub use google::GooglePlacesClient;

/// One circle-restricted nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchRequest {
    pub center: LatLng,
    pub radius_meters: f64,
    /// Provider type identifiers; empty means no type restriction.
    pub included_types: Vec<String>,
}

/// Provider-level outcome of a nearby search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Ok,
    /// Normal outcome for a sparse cell.
    ZeroResults,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchResponse {
    pub status: SearchStatus,
    pub places: Vec<PlaceRecord>,
}

impl NearbySearchResponse {
    #[must_use]
    pub fn ok(places: Vec<PlaceRecord>) -> Self {
        let status = if places.is_empty() {
            SearchStatus::ZeroResults
        } else {
            SearchStatus::Ok
        };
        Self { status, places }
    }

    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Failed {
                reason: reason.into(),
            },
            places: Vec::new(),
        }
    }
}

/// A source of places that can answer radius-bounded searches.
///
/// Implementations should stop work promptly once `cancel` fires. The
/// returned future must be `Send` because cell searches run on spawned tasks.
pub trait PlacesProvider: Send + Sync + 'static {
    fn nearby_search(
        &self,
        request: &NearbySearchRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<NearbySearchResponse, ProviderError>> + Send;
}
