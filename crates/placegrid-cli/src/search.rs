//! `search` command: one viewport search against the Places API.

use placegrid_core::{AggregateResult, AppConfig, SearchCriteria, ViewportBounds};
use placegrid_search::{GooglePlacesClient, SearchError, SearchOrchestrator};
use tokio_util::sync::CancellationToken;

/// Run a single search and print the ranked places.
///
/// Ctrl-C cancels the in-flight search; nothing is printed in that case.
///
/// # Errors
///
/// Returns an error if the Places client cannot be built, the viewport is
/// invalid, or the search is cancelled.
pub(crate) async fn run_search(
    config: &AppConfig,
    bounds: ViewportBounds,
    types: Vec<String>,
    min_rating: Option<f64>,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let client = GooglePlacesClient::with_base_url(
        &config.google_maps_api_key,
        config.provider_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Places client: {e}"))?;
    let orchestrator = SearchOrchestrator::new(client, config.search.clone());

    let criteria = build_criteria(bounds, types, min_rating, limit);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling search");
            on_interrupt.cancel();
        }
    });

    let result = match orchestrator.search(&criteria, &cancel).await {
        Ok(result) => result,
        Err(SearchError::Cancelled) => anyhow::bail!("search cancelled"),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
    } else {
        print_table(&result);
    }
    Ok(())
}

fn build_criteria(
    bounds: ViewportBounds,
    types: Vec<String>,
    min_rating: Option<f64>,
    limit: usize,
) -> SearchCriteria {
    let mut criteria = SearchCriteria::new(bounds, limit);
    if !types.is_empty() {
        criteria = criteria.with_types(types);
    }
    if let Some(rating) = min_rating {
        criteria = criteria.with_min_rating(rating);
    }
    criteria
}

fn print_table(result: &AggregateResult) {
    if result.places.is_empty() {
        println!("no places found in this viewport");
        return;
    }

    println!(
        "{:<8}{:<9}{:<22}{:<36}ADDRESS",
        "RATING", "REVIEWS", "TYPE", "NAME"
    );
    for place in &result.places {
        let rating = place
            .rating
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        let reviews = place
            .rating_count
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        println!(
            "{:<8}{:<9}{:<22}{:<36}{}",
            rating,
            reviews,
            truncate(&place.primary_type, 20),
            truncate(&place.name, 34),
            place.formatted_address.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!(
        "showing {} of {} unique places",
        result.places.len(),
        result.total_count
    );
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars - 3).collect::<String>())
    } else {
        s.to_string()
    }
}
