#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Address to map resolution

use std::sync::Arc;

use async_trait::async_trait;
use directory_config::GeocodingSettings;
use directory_model::{Coordinates, MapDisplay, MapSettings, MapState};
use directory_utils::text::is_blank;
use error_stack::{Result, ResultExt};
use tracing::warn;

pub mod nominatim;
pub mod view;

pub use nominatim::NominatimGeocoder;
pub use view::MapView;

/// Geocoding failure. The display text is shown to users.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingError {
    /// Map service responded with non-success HTTP status code.
    #[error("Map service error: {0}. Please try again later.")]
    Status(u16),
    /// Request was sent but no response was received.
    #[error("Network error. Could not reach map service.")]
    Network,
    /// Request could not be created.
    #[error("An error occurred while setting up the map request.")]
    Setup,
    #[error("Map service returned an invalid response.")]
    InvalidResponse,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of the first search result or `None` if nothing was
    /// found.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodingError>;
}

/// Nominatim geocoder with its own HTTP client.
pub fn create_geocoder(settings: &GeocodingSettings) -> Result<Arc<dyn Geocoder>, GeocodingError> {
    let client = reqwest::Client::builder()
        .build()
        .change_context(GeocodingError::Setup)?;
    Ok(Arc::new(NominatimGeocoder::new(client, settings.clone())))
}

pub fn not_found_message(address: &str) -> String {
    format!("Could not find coordinates for \"{address}\".")
}

/// Resolve address to map state. Missing or blank address does not
/// make a geocoding request.
pub async fn resolve_map(
    geocoder: &dyn Geocoder,
    address: Option<&str>,
    settings: &MapSettings,
) -> MapState {
    let address = match address {
        Some(address) if !is_blank(Some(address)) => address,
        _ => return MapState::NoAddress,
    };

    match geocoder.geocode(address).await {
        Ok(Some(coordinates)) => MapState::Ready(MapDisplay::new(address, coordinates, settings)),
        Ok(None) => {
            warn!("No geocoding results for address {address:?}");
            MapState::Error(not_found_message(address))
        }
        Err(e) => {
            warn!("Geocoding failed, error: {e:?}");
            MapState::Error(e.current_context().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use directory_utils::ContextExt;

    use super::*;

    /// Returns the same response for every address.
    struct StaticGeocoder {
        response: std::result::Result<Option<Coordinates>, GeocodingError>,
        calls: AtomicUsize,
    }

    impl StaticGeocoder {
        fn new(response: std::result::Result<Option<Coordinates>, GeocodingError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn geocode(&self, _: &str) -> Result<Option<Coordinates>, GeocodingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.map_err(|e| e.report())
        }
    }

    fn settings() -> MapSettings {
        MapSettings {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "OpenStreetMap contributors".to_string(),
            zoom: 13,
        }
    }

    #[tokio::test]
    async fn blank_address_is_not_geocoded() {
        let geocoder = StaticGeocoder::new(Ok(None));
        for address in [None, Some(""), Some("   ")] {
            let state = resolve_map(&geocoder, address, &settings()).await;
            assert_eq!(state, MapState::NoAddress);
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_result_is_displayed() {
        let coordinates = Coordinates::parse("37.4224", "-122.0842").unwrap();
        let geocoder = StaticGeocoder::new(Ok(Some(coordinates)));
        let state = resolve_map(&geocoder, Some("1600 Amphitheatre Parkway"), &settings()).await;
        let MapState::Ready(display) = state else {
            panic!("map expected, state: {state:?}");
        };
        assert_eq!(display.center, coordinates);
        assert_eq!(display.marker.position, coordinates);
        assert_eq!(display.zoom, 13);
        assert_eq!(display.marker.popup.address, "1600 Amphitheatre Parkway");
        assert_eq!(
            display.marker.popup.coordinates,
            "Lat: 37.42240, Lng: -122.08420"
        );
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_results_error_names_the_address() {
        let geocoder = StaticGeocoder::new(Ok(None));
        let state = resolve_map(&geocoder, Some("Nowhereville"), &settings()).await;
        assert_eq!(
            state,
            MapState::Error("Could not find coordinates for \"Nowhereville\".".to_string())
        );
    }

    #[tokio::test]
    async fn failure_classes_have_distinct_messages() {
        let status = StaticGeocoder::new(Err(GeocodingError::Status(503)));
        let network = StaticGeocoder::new(Err(GeocodingError::Network));
        let status = resolve_map(&status, Some("Helsinki"), &settings()).await;
        let network = resolve_map(&network, Some("Helsinki"), &settings()).await;
        assert_eq!(
            status.message(),
            Some("Map service error: 503. Please try again later.")
        );
        assert_eq!(
            network.message(),
            Some("Network error. Could not reach map service.")
        );
    }
}
