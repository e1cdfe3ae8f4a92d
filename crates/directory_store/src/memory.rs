//! In RAM profile store for debug mode and tests

use async_trait::async_trait;
use directory_model::{Profile, ProfileId, ValidatedProfileContent};
use error_stack::{Result, ResultExt};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{ProfileStore, StoreError};

/// Profiles are listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl MemoryProfileStore {
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.read().await.clone())
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn add_profile(
        &self,
        content: &ValidatedProfileContent,
    ) -> Result<ProfileId, StoreError> {
        let id = ProfileId::new(Uuid::new_v4().simple().to_string());
        self.profiles
            .write()
            .await
            .push(Profile::new(id.clone(), content.clone()));
        Ok(id)
    }

    async fn update_profile(
        &self,
        id: &ProfileId,
        content: &ValidatedProfileContent,
    ) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(StoreError::NotFound)
            .attach_printable_lazy(|| id.to_string())?;
        *profile = Profile::new(id.clone(), content.clone());
        Ok(())
    }

    /// Deleting a missing profile succeeds like it does in Firestore.
    async fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError> {
        self.profiles.write().await.retain(|p| &p.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use directory_model::ProfileContent;

    use super::*;

    fn content(name: &str, address: &str) -> ValidatedProfileContent {
        ProfileContent {
            name: name.to_string(),
            address: address.to_string(),
            ..ProfileContent::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn profiles_are_listed_in_insertion_order() {
        let store = MemoryProfileStore::default();
        let a = store.add_profile(&content("A", "")).await.unwrap();
        let b = store.add_profile(&content("B", "")).await.unwrap();
        assert_ne!(a, b);
        let ids: Vec<ProfileId> = store
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let store = MemoryProfileStore::default();
        let id = store.add_profile(&content("A", "Helsinki")).await.unwrap();
        store.update_profile(&id, &content("B", "")).await.unwrap();
        let profile = store.get_profile(&id).await.unwrap().unwrap();
        assert_eq!(profile.name, "B");
        assert_eq!(profile.address, None);
    }

    #[tokio::test]
    async fn update_of_missing_profile_fails() {
        let store = MemoryProfileStore::default();
        let id = ProfileId::new("missing".to_string());
        let error = store.update_profile(&id, &content("A", "")).await.unwrap_err();
        assert_eq!(error.current_context(), &StoreError::NotFound);
        assert_eq!(store.get_profile(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_missing_profile_succeeds() {
        let store = MemoryProfileStore::default();
        let id = store.add_profile(&content("A", "")).await.unwrap();
        let missing = ProfileId::new("missing".to_string());
        store.delete_profile(&missing).await.unwrap();
        store.delete_profile(&id).await.unwrap();
        store.delete_profile(&id).await.unwrap();
        assert!(store.list_profiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_profile_is_removed() {
        let store = MemoryProfileStore::default();
        let id = store.add_profile(&content("A", "")).await.unwrap();
        store.delete_profile(&id).await.unwrap();
        assert!(store.list_profiles().await.unwrap().is_empty());
    }
}
