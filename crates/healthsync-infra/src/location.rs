//! Location source for the terminal client.
//!
//! There is no device geolocation in a terminal, so the position comes from
//! configuration or the command line.

use healthsync_core::facility::LocationProvider;
use healthsync_types::error::LocationError;
use healthsync_types::facility::Coordinates;

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationProvider {
    location: Option<Coordinates>,
}

impl FixedLocationProvider {
    pub fn new(location: Option<Coordinates>) -> Self {
        Self { location }
    }
}

impl LocationProvider for FixedLocationProvider {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.location
            .ok_or_else(|| LocationError::Unavailable("no location configured".to_string()))
    }
}

/// Parse `"lat,lng"` in decimal degrees.
pub fn parse_coordinates(s: &str) -> Result<Coordinates, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lng', got '{s}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("invalid latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("invalid longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("coordinates out of range: {lat},{lng}"));
    }
    Ok(Coordinates::new(lat, lng))
}
