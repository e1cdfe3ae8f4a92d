#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! UI independent view state for the profile directory.
//!
//! Views load data from [ProfileStore] and expose serializable snapshots
//! which a front end renders.

use std::sync::Arc;

use directory_geocoding::{Geocoder, MapView};
use directory_model::{AvatarUrls, MapSettings};
use directory_store::ProfileStore;
use serde::Serialize;

pub mod admin;
pub mod detail;
pub mod directory;
pub mod overlay;

#[cfg(test)]
mod test_utils;

pub use admin::{AdminError, AdminPanel, AdminSnapshot, PendingDeletion, SharedAdminPanel};
pub use detail::{DetailSnapshot, DetailView};
pub use directory::{DirectorySnapshot, DirectoryView, ProfileCard};
pub use overlay::{MapOverlay, MapOverlaySnapshot};

/// Services which views use.
#[derive(Clone)]
pub struct ViewContext {
    pub store: Arc<dyn ProfileStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub map_settings: Arc<MapSettings>,
    pub avatars: Arc<AvatarUrls>,
}

impl ViewContext {
    pub fn map_view(&self) -> MapView {
        MapView::new(self.geocoder.clone(), self.map_settings.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

/// Top level navigation links.
pub fn navigation() -> Vec<NavLink> {
    vec![
        NavLink {
            label: "Home",
            path: "/",
        },
        NavLink {
            label: "Admin Panel",
            path: "/admin",
        },
    ]
}
