//! Domain values shared by the search pipeline.
//!
//! All coordinates are WGS84 degrees. Longitudes live in `(-180, 180]`; a
//! viewport whose `east` is smaller than its `west` crosses the antimeridian.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Rectangular lat/lng region, usually a client's map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl ViewportBounds {
    #[must_use]
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Checks the invariants the partitioner relies on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBounds`] when any edge is not finite, when
    /// `north <= south`, or when `east == west`.
    pub fn validate(&self) -> Result<(), CoreError> {
        let reason = if ![self.north, self.south, self.east, self.west]
            .iter()
            .all(|v| v.is_finite())
        {
            Some("edges must be finite")
        } else if self.north <= self.south {
            Some("north must be greater than south")
        } else if (self.east - self.west).abs() < f64::EPSILON {
            Some("east must not equal west")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidBounds {
                north: self.north,
                south: self.south,
                east: self.east,
                west: self.west,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees, measured eastward from `west` so that
    /// antimeridian-crossing viewports still have a positive span.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        let span = self.east - self.west;
        if span < 0.0 {
            span + 360.0
        } else {
            span
        }
    }

    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.east < self.west
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.north + self.south) / 2.0,
            lng: wrap_longitude(self.west + self.lng_span() / 2.0),
        }
    }
}

/// Folds an unwrapped longitude (up to one turn past 180) back into `(-180, 180]`.
#[must_use]
pub fn wrap_longitude(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else {
        lng
    }
}

/// One rectangular subdivision of a viewport.
///
/// `row` and `column` exist for log output only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub bounds: ViewportBounds,
    pub row: usize,
    pub column: usize,
}

/// A validated search request as handed over by the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub bounds: ViewportBounds,
    /// Provider type identifiers, already expanded from user-facing categories.
    pub types: Option<Vec<String>>,
    pub min_rating: Option<f64>,
    pub max_results: usize,
}

impl SearchCriteria {
    #[must_use]
    pub fn new(bounds: ViewportBounds, max_results: usize) -> Self {
        Self {
            bounds,
            types: None,
            min_rating: None,
            max_results,
        }
    }

    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Type filters, or an empty slice when the search is unfiltered.
    #[must_use]
    pub fn type_filters(&self) -> &[String] {
        self.types.as_deref().unwrap_or_default()
    }

    /// Whether a place with `rating` passes the minimum-rating threshold.
    ///
    /// Unrated places only pass when no threshold was requested.
    #[must_use]
    pub fn accepts_rating(&self, rating: Option<f64>) -> bool {
        match self.min_rating {
            None => true,
            Some(threshold) => rating.is_some_and(|r| r >= threshold),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Option<Vec<String>>,
}

/// Provider-normalized point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Stable provider identifier; the dedup key across cells.
    pub place_id: String,
    pub name: String,
    pub primary_type: String,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    pub location: LatLng,
}

/// Ranked, truncated search output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub places: Vec<PlaceRecord>,
    /// Unique places found before truncation to `max_results`.
    pub total_count: usize,
}
