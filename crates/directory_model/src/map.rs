use std::fmt;

use serde::Serialize;

pub const NO_ADDRESS_MESSAGE: &str = "No address provided.";

/// Geographic position in degrees. Both values are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    /// Parse coordinates from the string values geocoding services use.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude = latitude.trim().parse().ok()?;
        let longitude = longitude.trim().parse().ok()?;
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.5}, Lng: {:.5}", self.latitude, self.longitude)
    }
}

/// Map presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSettings {
    /// Slippy map tile URL template
    pub tile_url: String,
    pub attribution: String,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinates,
    pub popup: MarkerPopup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPopup {
    pub address: String,
    /// For example `Lat: 37.42240, Lng: -122.08420`
    pub coordinates: String,
}

/// Map centered on a single marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDisplay {
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub marker: Marker,
}

impl MapDisplay {
    pub fn new(address: &str, coordinates: Coordinates, settings: &MapSettings) -> Self {
        Self {
            center: coordinates,
            zoom: settings.zoom,
            tile_layer: TileLayer {
                url: settings.tile_url.clone(),
                attribution: settings.attribution.clone(),
            },
            marker: Marker {
                position: coordinates,
                popup: MarkerPopup {
                    address: address.to_string(),
                    coordinates: coordinates.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum MapState {
    /// Address is missing or blank. Geocoding is not attempted.
    NoAddress,
    Loading,
    Error(String),
    Ready(MapDisplay),
}

impl MapState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// User visible status text. Ready state has no status text.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NoAddress => Some(NO_ADDRESS_MESSAGE),
            Self::Loading => Some("Loading map..."),
            Self::Error(message) => Some(message),
            Self::Ready(_) => None,
        }
    }
}
