//! Single profile view

use directory_geocoding::MapView;
use directory_model::{AvatarSize, MapState, Profile, ProfileId, RenderState};
use serde::Serialize;
use tracing::error;

use crate::ViewContext;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profile. Please try again later.";
pub const NOT_FOUND_MESSAGE: &str = "Profile not found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDetails {
    pub id: ProfileId,
    pub name: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSnapshot {
    pub profile: RenderState<ProfileDetails>,
    pub notice: Option<&'static str>,
    /// Only profiles with an address have a map.
    pub map: Option<MapState>,
}

pub struct DetailView {
    context: ViewContext,
    id: ProfileId,
    profile: RenderState<Profile>,
    map: MapView,
}

impl DetailView {
    pub fn new(context: ViewContext, id: ProfileId) -> Self {
        Self {
            map: context.map_view(),
            context,
            id,
            profile: RenderState::Loading,
        }
    }

    /// Load the profile and start resolving its address.
    pub async fn load(&mut self) {
        self.profile = RenderState::Loading;
        self.profile = match self.context.store.get_profile(&self.id).await {
            Ok(Some(profile)) => {
                self.map.set_address(profile.address.clone());
                RenderState::Ready(profile)
            }
            Ok(None) => {
                self.map.set_address(None);
                RenderState::Empty
            }
            Err(e) => {
                error!("Loading profile {} failed, error: {:?}", self.id, e);
                self.map.set_address(None);
                RenderState::Error(LOAD_FAILED_MESSAGE.to_string())
            }
        };
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        let profile = self.profile.as_ref().map(|profile| ProfileDetails {
            id: profile.id.clone(),
            name: profile.name.clone(),
            image_url: self.context.avatars.image_url(profile, AvatarSize::Card),
            description: profile.description.clone(),
            address: profile.address.clone(),
        });
        let map = self
            .profile
            .ready()
            .filter(|p| p.has_address())
            .map(|_| self.map.state());
        DetailSnapshot {
            notice: matches!(profile, RenderState::Empty).then_some(NOT_FOUND_MESSAGE),
            profile,
            map,
        }
    }

    /// Snapshot after the map resolution completes.
    pub async fn settled_snapshot(&self) -> DetailSnapshot {
        self.map.wait_settled().await;
        self.snapshot()
    }
}
