//! Search façade: cache lookup, then grid fan-out on a miss.

use std::sync::Arc;

use placegrid_core::{AggregateResult, SearchConfig, SearchCriteria};
use tokio_util::sync::CancellationToken;

use crate::aggregate::aggregate;
use crate::cache::{Expiry, ResultCache};
use crate::error::SearchError;
use crate::fanout::fan_out;
use crate::fingerprint::fingerprint;
use crate::grid;
use crate::provider::PlacesProvider;

/// Answers viewport searches by fanning out over a grid of provider calls.
///
/// Cheap to share: the provider and cache sit behind `Arc`s, and one cache
/// can back several orchestrators.
pub struct SearchOrchestrator<P> {
    provider: Arc<P>,
    cache: Arc<ResultCache>,
    config: SearchConfig,
}

impl<P: PlacesProvider> SearchOrchestrator<P> {
    pub fn new(provider: P, config: SearchConfig) -> Self {
        Self::with_cache(Arc::new(provider), Arc::new(ResultCache::new()), config)
    }

    pub fn with_cache(provider: Arc<P>, cache: Arc<ResultCache>, config: SearchConfig) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one search, serving from cache when an equivalent search is fresh.
    ///
    /// Individual cell failures only shrink the result. Nothing is cached
    /// when the search is cancelled.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Upstream`] if the search cannot be planned, e.g. for
    ///   degenerate bounds or a non-positive cell size.
    /// - [`SearchError::Cancelled`] if `cancel` fires before every cell finished.
    ///   This is the one outcome not reported as `Upstream`.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        cancel: &CancellationToken,
    ) -> Result<Arc<AggregateResult>, SearchError> {
        let key = fingerprint(criteria);
        let b = &criteria.bounds;

        if let Some(cached) = self.cache.get(&key) {
            tracing::info!(
                north = b.north,
                south = b.south,
                east = b.east,
                west = b.west,
                "cache hit for place search"
            );
            return Ok(cached);
        }

        tracing::info!(
            north = b.north,
            south = b.south,
            east = b.east,
            west = b.west,
            "cache miss, executing place search"
        );

        let plan = grid::plan(
            b,
            self.config.grid_cell_size_degrees,
            self.config.max_grid_cells,
        )
        .inspect_err(|err| tracing::error!(error = %err, "could not plan place search"))?;

        tracing::info!(
            cell_count = plan.cells.len(),
            cell_size = plan.cell_size_degrees,
            "divided search area into grid cells"
        );

        let report = fan_out(
            Arc::clone(&self.provider),
            plan.cells,
            Arc::new(criteria.clone()),
            self.config.max_parallel_requests,
            cancel,
        )
        .await;

        if report.cancelled {
            tracing::info!(
                cells_completed = report.cells_completed,
                cells_total = report.cells_total,
                "place search cancelled; result not cached"
            );
            return Err(SearchError::Cancelled);
        }

        let result = Arc::new(aggregate(report.places, criteria.max_results));

        tracing::info!(
            unique_places = result.total_count,
            returned = result.places.len(),
            cells_completed = report.cells_completed,
            "aggregated place search results"
        );

        self.cache.insert(
            key.clone(),
            Arc::clone(&result),
            Expiry {
                absolute: self.config.cache_absolute_ttl,
                sliding: self.config.cache_sliding_ttl,
            },
        );
        tracing::info!(cache_key = %key, "cached place search result");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use placegrid_core::{LatLng, PlaceRecord, ViewportBounds};

    use crate::error::ProviderError;
    use crate::provider::{NearbySearchRequest, NearbySearchResponse};

    /// How a cell south of the failure line misbehaves.
    #[derive(Clone, Copy)]
    enum Failure {
        Status,
        Error,
        Panic,
    }

    /// One place per cell, keyed by the cell center. Cells whose center lies
    /// south of `fail_below_lat` fail in the configured way.
    struct PerCell {
        calls: AtomicUsize,
        fail_below_lat: f64,
        failure: Failure,
    }

    impl PerCell {
        fn new() -> Self {
            Self::failing_below(f64::NEG_INFINITY, Failure::Status)
        }

        fn failing_below(lat: f64, failure: Failure) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_below_lat: lat,
                failure,
            }
        }
    }

    impl PlacesProvider for PerCell {
        async fn nearby_search(
            &self,
            request: &NearbySearchRequest,
            _cancel: &CancellationToken,
        ) -> Result<NearbySearchResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.center.lat < self.fail_below_lat {
                return match self.failure {
                    Failure::Status => Ok(NearbySearchResponse::failed("INTERNAL")),
                    Failure::Error => Err(ProviderError::Deserialize {
                        context: "searchNearby".to_string(),
                        source: serde_json::from_str::<u8>("not json").unwrap_err(),
                    }),
                    Failure::Panic => panic!("provider crashed"),
                };
            }
            Ok(NearbySearchResponse::ok(vec![PlaceRecord {
                place_id: format!("{:.4},{:.4}", request.center.lat, request.center.lng),
                name: "spot".to_string(),
                primary_type: "restaurant".to_string(),
                rating: Some(4.2),
                rating_count: Some(12),
                formatted_address: None,
                phone: None,
                opening_hours: None,
                location: LatLng {
                    lat: request.center.lat,
                    lng: request.center.lng,
                },
            }]))
        }
    }

    fn midtown() -> SearchCriteria {
        SearchCriteria::new(ViewportBounds::new(40.758, 40.748, -73.9855, -73.9955), 30)
    }

    #[tokio::test]
    async fn miss_fans_out_and_caches() {
        let orchestrator = SearchOrchestrator::new(PerCell::new(), SearchConfig::default());
        let result = orchestrator
            .search(&midtown(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.total_count, 4);
        assert_eq!(result.places.len(), 4);
        assert_eq!(orchestrator.provider.calls.load(Ordering::SeqCst), 4);
        assert_eq!(orchestrator.cache().len(), 1);
    }

    #[tokio::test]
    async fn equivalent_search_is_served_from_cache() {
        let orchestrator = SearchOrchestrator::new(PerCell::new(), SearchConfig::default());
        let first = orchestrator
            .search(&midtown(), &CancellationToken::new())
            .await
            .unwrap();

        let mut noisy = midtown();
        noisy.bounds.north += 0.000_01;
        let second = orchestrator
            .search(&noisy, &CancellationToken::new())
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(orchestrator.provider.calls.load(Ordering::SeqCst), 4);
    }

    /// Bottom row centers sit at 40.7505; top row at 40.7555.
    async fn search_with_bottom_row_failing(failure: Failure) -> (Arc<AggregateResult>, usize) {
        let orchestrator = SearchOrchestrator::new(
            PerCell::failing_below(40.753, failure),
            SearchConfig::default(),
        );
        let result = orchestrator
            .search(&midtown(), &CancellationToken::new())
            .await
            .unwrap();
        (result, orchestrator.cache().len())
    }

    #[tokio::test]
    async fn failing_cells_only_shrink_the_result() {
        let (result, cached) = search_with_bottom_row_failing(Failure::Status).await;

        assert_eq!(result.total_count, 2);
        assert!(result.places.iter().all(|p| p.location.lat > 40.753));
        assert_eq!(cached, 1);
    }

    #[tokio::test]
    async fn provider_errors_only_shrink_the_result() {
        let (result, cached) = search_with_bottom_row_failing(Failure::Error).await;

        assert_eq!(result.total_count, 2);
        assert!(result.places.iter().all(|p| p.location.lat > 40.753));
        assert_eq!(cached, 1);
    }

    #[tokio::test]
    async fn panicking_provider_calls_only_shrink_the_result() {
        let (result, cached) = search_with_bottom_row_failing(Failure::Panic).await;

        assert_eq!(result.total_count, 2);
        assert!(result.places.iter().all(|p| p.location.lat > 40.753));
        assert_eq!(cached, 1);
    }

    #[tokio::test]
    async fn degenerate_bounds_fail_without_calling_provider() {
        let orchestrator = SearchOrchestrator::new(PerCell::new(), SearchConfig::default());
        let flat = SearchCriteria::new(ViewportBounds::new(40.75, 40.75, -73.98, -73.99), 10);

        let err = orchestrator
            .search(&flat, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Upstream { .. }));
        assert_eq!(orchestrator.provider.calls.load(Ordering::SeqCst), 0);
        assert!(orchestrator.cache().is_empty());
    }

    #[tokio::test]
    async fn cancelled_search_is_not_cached() {
        let orchestrator = SearchOrchestrator::new(PerCell::new(), SearchConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = orchestrator.search(&midtown(), &cancel).await.unwrap_err();

        assert!(matches!(err, SearchError::Cancelled));
        assert!(orchestrator.cache().is_empty());

        // A later uncancelled search still runs in full.
        let result = orchestrator
            .search(&midtown(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.total_count, 4);
    }

    #[tokio::test]
    async fn shared_cache_spans_orchestrators() {
        let cache = Arc::new(ResultCache::new());
        let a = SearchOrchestrator::with_cache(
            Arc::new(PerCell::new()),
            Arc::clone(&cache),
            SearchConfig::default(),
        );
        let b = SearchOrchestrator::with_cache(
            Arc::new(PerCell::new()),
            Arc::clone(&cache),
            SearchConfig::default(),
        );

        a.search(&midtown(), &CancellationToken::new()).await.unwrap();
        b.search(&midtown(), &CancellationToken::new()).await.unwrap();

        assert_eq!(b.provider.calls.load(Ordering::SeqCst), 0);
    }
}
