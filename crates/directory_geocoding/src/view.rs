//! Map view which follows an address

use std::sync::Arc;

use directory_model::{MapSettings, MapState};
use directory_utils::text::is_blank;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{Geocoder, resolve_map};

/// Map state for the current address of a view.
///
/// Every address change starts a new resolution and cancels the previous
/// one. A cancelled resolution never updates the state. Dropping the view
/// cancels the resolution in progress.
pub struct MapView {
    geocoder: Arc<dyn Geocoder>,
    settings: Arc<MapSettings>,
    address: Option<String>,
    state: Arc<watch::Sender<MapState>>,
    resolution: CancellationToken,
}

impl MapView {
    pub fn new(geocoder: Arc<dyn Geocoder>, settings: Arc<MapSettings>) -> Self {
        let (state, _) = watch::channel(MapState::NoAddress);
        Self {
            geocoder,
            settings,
            address: None,
            state: Arc::new(state),
            resolution: CancellationToken::new(),
        }
    }

    /// Start resolving a new address. Nothing happens if the address is
    /// the same as the current one.
    ///
    /// Must be called from a Tokio runtime context.
    pub fn set_address(&mut self, address: Option<String>) {
        if self.address == address {
            return;
        }

        self.resolution.cancel();
        self.resolution = CancellationToken::new();
        self.address = address;

        if is_blank(self.address.as_deref()) {
            self.state.send_replace(MapState::NoAddress);
            return;
        }

        self.state.send_replace(MapState::Loading);

        let token = self.resolution.clone();
        let state = self.state.clone();
        let geocoder = self.geocoder.clone();
        let settings = self.settings.clone();
        let address = self.address.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => (),
                new_state = resolve_map(geocoder.as_ref(), address.as_deref(), &settings) => {
                    // Token is cancelled before a newer state is sent.
                    state.send_if_modified(|current| {
                        if token.is_cancelled() {
                            false
                        } else {
                            *current = new_state;
                            true
                        }
                    });
                }
            }
        });
    }

    pub fn state(&self) -> MapState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MapState> {
        self.state.subscribe()
    }

    /// Wait until the current resolution completes.
    pub async fn wait_settled(&self) -> MapState {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        self.resolution.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use directory_model::Coordinates;
    use error_stack::Result;
    use tokio::sync::Notify;

    use super::*;
    use crate::GeocodingError;

    const SLOW_ADDRESS: &str = "Slow street 1";

    /// Geocoding for [SLOW_ADDRESS] completes only after release.
    #[derive(Default)]
    struct GatedGeocoder {
        calls: AtomicUsize,
        completed: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl Geocoder for GatedGeocoder {
        async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let coordinates = if address == SLOW_ADDRESS {
                self.release.notified().await;
                Coordinates::new(10.0, 10.0)
            } else {
                Coordinates::new(60.0, 25.0)
            };
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(coordinates)
        }
    }

    fn view() -> (MapView, Arc<GatedGeocoder>) {
        let geocoder = Arc::new(GatedGeocoder::default());
        let settings = MapSettings {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "OpenStreetMap contributors".to_string(),
            zoom: 13,
        };
        (
            MapView::new(geocoder.clone(), Arc::new(settings)),
            geocoder,
        )
    }

    fn center(state: &MapState) -> Option<Coordinates> {
        match state {
            MapState::Ready(display) => Some(display.center),
            _ => None,
        }
    }

    #[tokio::test]
    async fn blank_address_makes_no_requests() {
        let (mut view, geocoder) = view();
        view.set_address(Some("  ".to_string()));
        assert_eq!(view.wait_settled().await, MapState::NoAddress);
        view.set_address(None);
        assert_eq!(view.state(), MapState::NoAddress);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn address_is_resolved() {
        let (mut view, _) = view();
        view.set_address(Some("Helsinki".to_string()));
        assert!(view.state().is_loading());
        let state = view.wait_settled().await;
        assert_eq!(center(&state), Coordinates::new(60.0, 25.0));
    }

    #[tokio::test]
    async fn same_address_is_not_resolved_again() {
        let (mut view, geocoder) = view();
        view.set_address(Some("Helsinki".to_string()));
        view.wait_settled().await;
        view.set_address(Some("Helsinki".to_string()));
        view.wait_settled().await;
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn superseded_result_is_discarded() {
        let (mut view, geocoder) = view();
        view.set_address(Some(SLOW_ADDRESS.to_string()));
        view.set_address(Some("Helsinki".to_string()));
        let state = view.wait_settled().await;
        assert_eq!(center(&state), Coordinates::new(60.0, 25.0));

        geocoder.release.notify_one();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(center(&view.state()), Coordinates::new(60.0, 25.0));
    }

    #[tokio::test]
    async fn address_removal_cancels_resolution() {
        let (mut view, geocoder) = view();
        view.set_address(Some(SLOW_ADDRESS.to_string()));
        view.set_address(None);
        geocoder.release.notify_one();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(view.state(), MapState::NoAddress);
    }

    #[tokio::test]
    async fn dropped_view_is_not_updated() {
        let (mut view, geocoder) = view();
        view.set_address(Some(SLOW_ADDRESS.to_string()));
        let receiver = view.subscribe();
        drop(view);
        geocoder.release.notify_one();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(receiver.borrow().is_loading());
        assert_eq!(geocoder.completed.load(Ordering::SeqCst), 0);
    }
}
