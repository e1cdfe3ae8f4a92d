//! Profile directory listing with search

use directory_model::{AvatarSize, AvatarUrls, Profile, ProfileId, RenderState};
use serde::Serialize;
use tracing::error;

use crate::ViewContext;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profiles. Please try again later.";
pub const NO_MATCHES_MESSAGE: &str = "No profiles found matching your search.";
pub const NO_DESCRIPTION: &str = "No description available.";

/// Directory list item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub id: ProfileId,
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub details_path: String,
    /// Show map action is available.
    pub show_map: bool,
}

impl ProfileCard {
    pub fn new(profile: &Profile, avatars: &AvatarUrls) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            image_url: avatars.image_url(profile, AvatarSize::Card),
            description: profile
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            details_path: format!("/profile/{}", profile.id),
            show_map: profile.has_address(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorySnapshot {
    pub query: String,
    pub profiles: RenderState<Vec<ProfileCard>>,
    /// Text for empty state
    pub notice: Option<&'static str>,
}

pub struct DirectoryView {
    context: ViewContext,
    profiles: RenderState<Vec<Profile>>,
}

impl DirectoryView {
    pub fn new(context: ViewContext) -> Self {
        Self {
            context,
            profiles: RenderState::Loading,
        }
    }

    /// Load the full profile list from the store.
    pub async fn load(&mut self) {
        self.profiles = RenderState::Loading;
        self.profiles = match self.context.store.list_profiles().await {
            Ok(profiles) => RenderState::Ready(profiles),
            Err(e) => {
                error!("Loading directory profiles failed, error: {:?}", e);
                RenderState::Error(LOAD_FAILED_MESSAGE.to_string())
            }
        };
    }

    /// Filter the loaded list. Filtering does not access the store.
    pub fn search(&self, query: &str) -> DirectorySnapshot {
        let profiles = match &self.profiles {
            RenderState::Loading => RenderState::Loading,
            RenderState::Error(message) => RenderState::Error(message.clone()),
            RenderState::Empty => RenderState::Empty,
            RenderState::Ready(profiles) => {
                let cards: Vec<ProfileCard> = directory_model::filter_profiles(profiles, query)
                    .into_iter()
                    .map(|p| ProfileCard::new(p, &self.context.avatars))
                    .collect();
                if cards.is_empty() {
                    RenderState::Empty
                } else {
                    RenderState::Ready(cards)
                }
            }
        };

        DirectorySnapshot {
            query: query.to_string(),
            notice: matches!(profiles, RenderState::Empty).then_some(NO_MATCHES_MESSAGE),
            profiles,
        }
    }
}
