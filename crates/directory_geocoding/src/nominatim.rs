//! Nominatim search API client

use async_trait::async_trait;
use directory_config::GeocodingSettings;
use directory_model::Coordinates;
use directory_utils::ContextExt;
use error_stack::{Result, ResultExt};
use serde::Deserialize;

use crate::{Geocoder, GeocodingError};

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    settings: GeocodingSettings,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, settings: GeocodingSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodingError> {
        let mut url = self.settings.url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", address)
            .append_pair("limit", "1");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(|e| {
                let context = if e.is_builder() {
                    GeocodingError::Setup
                } else {
                    GeocodingError::Network
                };
                error_stack::Report::new(e).change_context(context)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status.as_u16()).report());
        }

        let body = response
            .bytes()
            .await
            .change_context(GeocodingError::Network)?;
        let results: Vec<SearchResult> =
            serde_json::from_slice(&body).change_context(GeocodingError::InvalidResponse)?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        Coordinates::parse(&first.lat, &first.lon)
            .map(Some)
            .ok_or(GeocodingError::InvalidResponse.report())
            .attach_printable_lazy(|| format!("lat: {}, lon: {}", first.lat, first.lon))
    }
}
