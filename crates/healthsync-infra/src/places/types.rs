//! Google Places nearby-search response types.
//!
//! Only the fields the locator uses are modeled; everything else in the
//! response is ignored.

use serde::Deserialize;

use healthsync_types::facility::{Coordinates, PlaceResult};

#[derive(Debug, Deserialize)]
pub(crate) struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GooglePlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GooglePlace {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
}

impl From<GooglePlace> for PlaceResult {
    fn from(place: GooglePlace) -> Self {
        Self {
            place_id: place.place_id,
            name: place.name,
            address: place.vicinity.or(place.formatted_address),
            location: Coordinates::new(place.geometry.location.lat, place.geometry.location.lng),
            types: place.types,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            open_now: place.opening_hours.and_then(|h| h.open_now),
            phone: place.formatted_phone_number,
            website: place.website,
        }
    }
}
