//! GooglePlacesClient -- concrete [`PlacesSearch`] for the Google Places
//! nearby-search endpoint.
//!
//! One request per place type: `GET {base}/nearbysearch/json?location=lat,lng
//! &radius=..&type=..&key=..`. The API reports most failures with HTTP 200
//! and a non-`OK` `status` field, so both layers are checked.

mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use healthsync_core::facility::PlacesSearch;
use healthsync_types::error::PlacesError;
use healthsync_types::facility::{Coordinates, PlaceResult};

use self::types::NearbySearchResponse;

/// Does not derive Debug, so the API key cannot end up in logs.
pub struct GooglePlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GooglePlacesClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// `base_url` is the Places API root, e.g.
    /// `https://maps.googleapis.com/maps/api/place`.
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl PlacesSearch for GooglePlacesClient {
    async fn nearby(
        &self,
        origin: &Coordinates,
        place_type: &str,
        radius_m: u32,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let url = format!("{}/nearbysearch/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", origin.to_string()),
                ("radius", radius_m.to_string()),
                ("type", place_type.to_string()),
                ("key", self.api_key.expose_secret().to_string()),
            ])
            .send()
            .await
            .map_err(|e| PlacesError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlacesError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: NearbySearchResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Request(format!("failed to parse response: {}", e.without_url())))?;

        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().map(PlaceResult::from).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(PlacesError::Api(match body.error_message {
                Some(message) => format!("{other}: {message}"),
                None => other.to_string(),
            })),
        }
    }
}
