//! Wire types for the Places API (New) `places:searchNearby` endpoint.
//!
//! ### Empty results
//! A search with no matches returns `{}`; `places` is absent rather than an
//! empty array, hence `#[serde(default)]`.
//!
//! ### Errors
//! Non-2xx responses carry `{"error": {"code", "message", "status"}}`, where
//! `status` is a canonical code such as `PERMISSION_DENIED` or
//! `RESOURCE_EXHAUSTED`.
//!
//! ### Opening hours
//! `currentOpeningHours` reflects today (including special hours) and is the
//! better source for `openNow`; `regularOpeningHours` carries the weekly
//! `weekdayDescriptions`.

use serde::{Deserialize, Serialize};

use placegrid_core::{LatLng, OpeningHours, PlaceRecord};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchNearbyBody {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included_types: Vec<String>,
    pub max_result_count: u32,
    pub location_restriction: LocationRestriction,
}

#[derive(Debug, Serialize)]
pub(crate) struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Serialize)]
pub(crate) struct Circle {
    pub center: WireLatLng,
    pub radius: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<WirePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePlace {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    pub formatted_address: Option<String>,
    pub short_formatted_address: Option<String>,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub current_opening_hours: Option<WireOpeningHours>,
    pub regular_opening_hours: Option<WireOpeningHours>,
    pub location: Option<WireLatLng>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizedText {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOpeningHours {
    pub open_now: Option<bool>,
    pub weekday_descriptions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ErrorBody {
    pub(crate) fn describe(&self) -> String {
        let status = self.status.as_deref().unwrap_or("UNKNOWN");
        match (&self.message, self.code) {
            (Some(message), Some(code)) => format!("{status} ({code}): {message}"),
            (Some(message), None) => format!("{status}: {message}"),
            (None, Some(code)) => format!("{status} ({code})"),
            (None, None) => status.to_string(),
        }
    }
}

/// Normalize one provider place. Records without an id or a location cannot
/// be deduplicated or plotted and are dropped.
pub(crate) fn map_place(place: WirePlace) -> Option<PlaceRecord> {
    let place_id = place.id.filter(|id| !id.trim().is_empty())?;
    let location = place.location?;

    let primary_type = place
        .types
        .first()
        .map_or_else(|| "unknown".to_string(), |t| t.to_lowercase());

    let opening_hours = match (&place.current_opening_hours, &place.regular_opening_hours) {
        (None, None) => None,
        (current, regular) => Some(OpeningHours {
            open_now: current
                .as_ref()
                .and_then(|h| h.open_now)
                .or_else(|| regular.as_ref().and_then(|h| h.open_now)),
            weekday_text: regular.as_ref().and_then(|h| h.weekday_descriptions.clone()),
        }),
    };

    Some(PlaceRecord {
        place_id,
        name: place
            .display_name
            .and_then(|d| d.text)
            .unwrap_or_else(|| "Unnamed".to_string()),
        primary_type,
        rating: place.rating,
        rating_count: place.user_rating_count,
        formatted_address: place.formatted_address.or(place.short_formatted_address),
        phone: place
            .national_phone_number
            .or(place.international_phone_number),
        opening_hours,
        location: LatLng {
            lat: location.latitude,
            lng: location.longitude,
        },
    })
}
