use std::future::Future;

use healthsync_types::error::{LocationError, PlacesError};
use healthsync_types::facility::{Coordinates, PlaceResult};

/// Resolves the user's current position.
pub trait LocationProvider: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Nearby search against a places API, one place type at a time.
pub trait PlacesSearch: Send + Sync {
    fn nearby(
        &self,
        origin: &Coordinates,
        place_type: &str,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<PlaceResult>, PlacesError>> + Send;
}
