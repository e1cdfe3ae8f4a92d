#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Remote profile collection access

use std::sync::Arc;

use async_trait::async_trait;
use directory_config::{Config, StoreBackend};
use directory_model::{Profile, ProfileId, ValidatedProfileContent};
use error_stack::{Result, ResultExt};

mod document;
pub mod firestore;
pub mod memory;

pub use firestore::FirestoreProfileStore;
pub use memory::MemoryProfileStore;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("Creating HTTP client failed")]
    ClientCreation,
    #[error("Building store URL failed")]
    UrlBuilding,
    #[error("Store request failed")]
    Request,
    #[error("Store responded with an error status")]
    Status,
    #[error("Store response was invalid")]
    InvalidResponse,
    #[error("Profile not found")]
    NotFound,
}

/// Profile collection with per document create, update and delete.
///
/// The store is the only source of truth. Callers never mutate cached
/// lists directly, they reload the list after every write.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profiles in the collection.
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Returns `None` if the document does not exist.
    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Create a new document. The store assigns the ID.
    async fn add_profile(&self, content: &ValidatedProfileContent)
    -> Result<ProfileId, StoreError>;

    /// Replace all profile fields of an existing document.
    ///
    /// Returns [StoreError::NotFound] if the document does not exist.
    async fn update_profile(
        &self,
        id: &ProfileId,
        content: &ValidatedProfileContent,
    ) -> Result<(), StoreError>;

    async fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError>;
}

/// Create the store selected in the config.
pub fn create_store(config: &Config) -> Result<Arc<dyn ProfileStore>, StoreError> {
    match config.store() {
        StoreBackend::Memory => {
            tracing::warn!("Using in RAM profile store. Profiles are lost when the server quits.");
            Ok(Arc::new(MemoryProfileStore::default()))
        }
        StoreBackend::Firestore(settings) => {
            let client = reqwest::Client::builder()
                .build()
                .change_context(StoreError::ClientCreation)?;
            Ok(Arc::new(FirestoreProfileStore::new(
                client,
                settings.clone(),
            )))
        }
    }
}
