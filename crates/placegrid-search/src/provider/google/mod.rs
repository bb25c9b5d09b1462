//! HTTP client for the Google Places API (New) nearby search.

mod types;

use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;

use super::{NearbySearchRequest, NearbySearchResponse, PlacesProvider};
use types::{
    map_place, Circle, ErrorEnvelope, LocationRestriction, SearchNearbyBody, SearchNearbyResponse,
    WireLatLng,
};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/";
const SEARCH_NEARBY_PATH: &str = "v1/places:searchNearby";

/// The provider returns at most 20 places per nearby search.
const MAX_RESULT_COUNT: u32 = 20;

const FIELD_MASK: &str = "places.id,places.displayName,places.types,places.rating,\
places.userRatingCount,places.formattedAddress,places.shortFormattedAddress,\
places.nationalPhoneNumber,places.internationalPhoneNumber,\
places.currentOpeningHours,places.regularOpeningHours,places.location";

/// Provider-agnostic type identifiers and their Places API equivalents.
const TYPE_TABLE: &[(&str, &str)] = &[
    ("restaurant", "restaurant"),
    ("cafe", "cafe"),
    ("bar", "bar"),
    ("bakery", "bakery"),
    ("meal_takeaway", "meal_takeaway"),
    ("coffee_shop", "coffee_shop"),
    ("supermarket", "supermarket"),
    ("grocery_store", "grocery_store"),
    ("convenience_store", "convenience_store"),
    ("tourist_attraction", "tourist_attraction"),
    ("museum", "museum"),
    ("art_gallery", "art_gallery"),
    ("landmark", "historical_landmark"),
    ("point_of_interest", "tourist_attraction"),
    ("aquarium", "aquarium"),
    ("zoo", "zoo"),
    ("amusement_park", "amusement_park"),
    ("shopping_mall", "shopping_mall"),
    ("store", "store"),
    ("clothing_store", "clothing_store"),
    ("department_store", "department_store"),
    ("park", "park"),
    ("natural_feature", "national_park"),
    ("campground", "campground"),
    ("beach", "beach"),
    ("pharmacy", "pharmacy"),
    ("hospital", "hospital"),
    ("doctor", "doctor"),
    ("atm", "atm"),
    ("bank", "bank"),
    ("post_office", "post_office"),
    ("laundry", "laundry"),
    ("gas_station", "gas_station"),
    ("parking", "parking"),
    ("transit_station", "transit_station"),
    ("bus_station", "bus_station"),
    ("train_station", "train_station"),
    ("night_club", "night_club"),
    ("casino", "casino"),
    ("movie_theater", "movie_theater"),
];

/// Translate type identifiers into the Places API vocabulary.
///
/// Matching is case-insensitive; unknown identifiers are dropped and
/// duplicates removed while keeping first-seen order.
pub fn included_types(types: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for requested in types {
        let Some((_, mapped)) = TYPE_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(requested.trim()))
        else {
            tracing::debug!(place_type = %requested, "dropping unsupported place type");
            continue;
        };
        if !out.iter().any(|t| t == mapped) {
            out.push((*mapped).to_string());
        }
    }
    out
}

/// Client for the Places API nearby search.
///
/// Use [`GooglePlacesClient::new`] for production or
/// [`GooglePlacesClient::with_base_url`] to point at a mock server in tests.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GooglePlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ProviderError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // One trailing slash so `join` appends rather than replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_NEARBY_PATH))
            .map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    async fn send(
        &self,
        request: &NearbySearchRequest,
    ) -> Result<NearbySearchResponse, ProviderError> {
        let body = SearchNearbyBody {
            included_types: included_types(&request.included_types),
            max_result_count: MAX_RESULT_COUNT,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: WireLatLng {
                        latitude: request.center.lat,
                        longitude: request.center.lng,
                    },
                    radius: request.radius_meters.trunc(),
                },
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let reason = serde_json::from_slice::<ErrorEnvelope>(&bytes).map_or_else(
                |_| format!("HTTP {}", status.as_u16()),
                |envelope| envelope.error.describe(),
            );
            return Ok(NearbySearchResponse::failed(reason));
        }

        let parsed: SearchNearbyResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Deserialize {
                context: format!(
                    "searchNearby(lat={}, lng={})",
                    request.center.lat, request.center.lng
                ),
                source: e,
            })?;

        let places = parsed.places.into_iter().filter_map(map_place).collect();
        Ok(NearbySearchResponse::ok(places))
    }
}

impl PlacesProvider for GooglePlacesClient {
    async fn nearby_search(
        &self,
        request: &NearbySearchRequest,
        cancel: &CancellationToken,
    ) -> Result<NearbySearchResponse, ProviderError> {
        tokio::select! {
            () = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.send(request) => result,
        }
    }
}
