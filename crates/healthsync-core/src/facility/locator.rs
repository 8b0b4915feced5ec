use std::collections::HashSet;
use std::time::Duration;

use healthsync_types::error::{LocationError, PlacesError};
use healthsync_types::facility::{Coordinates, Facility, FacilitySearchRequest};
use tokio::sync::mpsc;

use super::ports::{LocationProvider, PlacesSearch};

/// Default bound on a location lookup.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Places(#[from] PlacesError),
}

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct FacilityReport {
    pub origin: Coordinates,
    pub request: FacilitySearchRequest,
    /// Nearest first.
    pub facilities: Vec<Facility>,
}

impl FacilityReport {
    pub fn directions_url(&self, facility: &Facility) -> String {
        facility.directions_url(Some(&self.origin))
    }
}

pub struct FacilityLocator<L: LocationProvider, P: PlacesSearch> {
    location: L,
    places: P,
    geolocation_timeout: Duration,
    fallback_location: Option<Coordinates>,
}

impl<L: LocationProvider, P: PlacesSearch> FacilityLocator<L, P> {
    pub fn new(location: L, places: P) -> Self {
        Self {
            location,
            places,
            geolocation_timeout: GEOLOCATION_TIMEOUT,
            fallback_location: None,
        }
    }

    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    /// Search around `location` when the provider cannot resolve a position.
    pub fn with_fallback_location(mut self, location: Option<Coordinates>) -> Self {
        self.fallback_location = location;
        self
    }

    /// Resolve the user's position, bounded by the geolocation timeout.
    pub async fn locate(&self) -> Result<Coordinates, LocationError> {
        let result = match tokio::time::timeout(self.geolocation_timeout, self.location.locate()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        };

        match (result, self.fallback_location) {
            (Ok(coords), _) => Ok(coords),
            (Err(e), Some(fallback)) => {
                tracing::warn!(%fallback, "location lookup failed, using fallback: {e}");
                Ok(fallback)
            }
            (Err(e), None) => Err(e),
        }
    }

    /// Query every place type of the request's filter around `origin`.
    ///
    /// A failing place type is logged and skipped; the search only fails
    /// when every type failed.
    pub async fn search(
        &self,
        origin: Coordinates,
        request: FacilitySearchRequest,
    ) -> Result<Vec<Facility>, PlacesError> {
        let mut seen = HashSet::new();
        let mut facilities = Vec::new();
        let mut last_error = None;
        let mut any_succeeded = false;

        for place_type in request.filter.place_types() {
            match self.places.nearby(&origin, place_type, request.radius_m).await {
                Ok(places) => {
                    any_succeeded = true;
                    tracing::debug!(place_type, found = places.len(), "places search");
                    for place in places {
                        if seen.insert(place.place_id.clone()) {
                            facilities.push(Facility::from_place(place, place_type, Some(&origin)));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(place_type, "places search failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        if let (false, Some(e)) = (any_succeeded, last_error) {
            return Err(e);
        }

        facilities.sort_by(|a, b| {
            let da = a.distance_km.unwrap_or(f64::INFINITY);
            let db = b.distance_km.unwrap_or(f64::INFINITY);
            da.total_cmp(&db)
        });
        Ok(facilities)
    }

    /// Locate the user, then search.
    pub async fn handle(&self, request: FacilitySearchRequest) -> Result<FacilityReport, FacilityError> {
        let origin = self.locate().await?;
        let facilities = self.search(origin, request).await?;
        tracing::info!(
            filter = %request.filter,
            radius_m = request.radius_m,
            found = facilities.len(),
            "facility search complete"
        );
        Ok(FacilityReport {
            origin,
            request,
            facilities,
        })
    }

    /// Handle requests until every sender is dropped.
    pub async fn serve_requests<F>(&self, mut requests: mpsc::Receiver<FacilitySearchRequest>, mut on_report: F)
    where
        F: FnMut(Result<FacilityReport, FacilityError>),
    {
        while let Some(request) = requests.recv().await {
            on_report(self.handle(request).await);
        }
        tracing::debug!("facility request channel closed");
    }
}
