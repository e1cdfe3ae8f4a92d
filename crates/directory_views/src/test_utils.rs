use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use directory_geocoding::{Geocoder, GeocodingError};
use directory_model::{
    AvatarUrls, Coordinates, MapSettings, Profile, ProfileContent, ProfileId,
    ValidatedProfileContent,
};
use directory_store::{MemoryProfileStore, ProfileStore, StoreError};
use directory_utils::ContextExt;
use error_stack::Result;
use tokio::sync::Notify;

use crate::ViewContext;

/// In RAM store with switchable failures and a call counter.
#[derive(Default)]
pub struct TestStore {
    pub profiles: MemoryProfileStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub write_calls: AtomicUsize,
    /// When set, writes wait for `write_release`.
    pub gate_writes: AtomicBool,
    pub write_started: Notify,
    pub write_release: Notify,
}

impl TestStore {
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: MemoryProfileStore::with_profiles(profiles),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    async fn write(&self) -> Result<(), StoreError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.gate_writes.load(Ordering::SeqCst) {
            self.write_started.notify_one();
            self.write_release.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Status.report())
        } else {
            Ok(())
        }
    }

    fn read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(StoreError::Request.report())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for TestStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.read()?;
        self.profiles.list_profiles().await
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        self.read()?;
        self.profiles.get_profile(id).await
    }

    async fn add_profile(
        &self,
        content: &ValidatedProfileContent,
    ) -> Result<ProfileId, StoreError> {
        self.write().await?;
        self.profiles.add_profile(content).await
    }

    async fn update_profile(
        &self,
        id: &ProfileId,
        content: &ValidatedProfileContent,
    ) -> Result<(), StoreError> {
        self.write().await?;
        self.profiles.update_profile(id, content).await
    }

    async fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError> {
        self.write().await?;
        self.profiles.delete_profile(id).await
    }
}

/// Every address resolves to the same coordinates.
#[derive(Default)]
pub struct TestGeocoder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for TestGeocoder {
    async fn geocode(&self, _: &str) -> Result<Option<Coordinates>, GeocodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Coordinates::new(60.16952, 24.93545))
    }
}

pub fn profile(id: &str, name: &str, address: Option<&str>) -> Profile {
    let content = ProfileContent {
        name: name.to_string(),
        address: address.unwrap_or_default().to_string(),
        ..ProfileContent::default()
    };
    Profile::new(ProfileId::new(id.to_string()), content.validate().unwrap())
}

pub fn context(store: Arc<TestStore>) -> (ViewContext, Arc<TestGeocoder>) {
    let geocoder = Arc::new(TestGeocoder::default());
    let context = ViewContext {
        store,
        geocoder: geocoder.clone(),
        map_settings: Arc::new(MapSettings {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "OpenStreetMap contributors".to_string(),
            zoom: 13,
        }),
        avatars: Arc::new(AvatarUrls::new(
            "https://ui-avatars.com/api/".parse().unwrap(),
            "https://via.placeholder.com/".to_string(),
        )),
    };
    (context, geocoder)
}
