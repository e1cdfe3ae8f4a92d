//! Map overlay opened from a directory card

use directory_geocoding::MapView;
use directory_model::{MapState, Profile};
use serde::Serialize;

use crate::ViewContext;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOverlaySnapshot {
    pub title: String,
    /// Shown instead of the map when the profile has no address.
    pub alert: Option<String>,
    pub map: Option<MapState>,
}

/// Closing the overlay is dropping it.
pub struct MapOverlay {
    title: String,
    alert: Option<String>,
    map: Option<MapView>,
}

impl MapOverlay {
    pub fn open(profile: &Profile, context: &ViewContext) -> Self {
        let map = profile.address.as_ref().map(|address| {
            let mut map = context.map_view();
            map.set_address(Some(address.clone()));
            map
        });
        let alert = if map.is_none() {
            Some(format!("{} does not have an address provided.", profile.name))
        } else {
            None
        };
        Self {
            title: format!("Location for {}", profile.name),
            alert,
            map,
        }
    }

    pub fn snapshot(&self) -> MapOverlaySnapshot {
        MapOverlaySnapshot {
            title: self.title.clone(),
            alert: self.alert.clone(),
            map: self.map.as_ref().map(|m| m.state()),
        }
    }

    pub async fn settled_snapshot(&self) -> MapOverlaySnapshot {
        if let Some(map) = &self.map {
            map.wait_settled().await;
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, atomic::Ordering};

    use super::*;
    use crate::test_utils::{TestStore, context, profile};

    #[tokio::test]
    async fn overlay_shows_map_for_address() {
        let (context, geocoder) = context(Arc::new(TestStore::default()));
        let overlay = MapOverlay::open(&profile("1", "Ada", Some("London")), &context);
        let snapshot = overlay.settled_snapshot().await;
        assert_eq!(snapshot.title, "Location for Ada");
        assert_eq!(snapshot.alert, None);
        assert!(matches!(snapshot.map, Some(MapState::Ready(_))));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn overlay_without_address_shows_alert() {
        let (context, geocoder) = context(Arc::new(TestStore::default()));
        let overlay = MapOverlay::open(&profile("1", "Ada", None), &context);
        let snapshot = overlay.settled_snapshot().await;
        assert_eq!(
            snapshot.alert.as_deref(),
            Some("Ada does not have an address provided.")
        );
        assert_eq!(snapshot.map, None);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }
}
