use std::fmt;

use directory_utils::text::{is_blank, non_blank};
use serde::{Deserialize, Serialize};

/// Store assigned document ID. Never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory record stored in the remote profile collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Map features are offered only when this exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Profile {
    pub fn new(id: ProfileId, content: ValidatedProfileContent) -> Self {
        Self {
            id,
            name: content.name,
            photo: content.photo,
            description: content.description,
            address: content.address,
        }
    }

    /// Create profile from schemaless document fields. Blank optional
    /// values are stored as `None`, other values are kept as is.
    pub fn from_document_fields(
        id: ProfileId,
        name: Option<String>,
        photo: Option<String>,
        description: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.unwrap_or_default(),
            photo: photo.filter(|v| !is_blank(Some(v))),
            description: description.filter(|v| !is_blank(Some(v))),
            address: address.filter(|v| !is_blank(Some(v))),
        }
    }

    /// Case-insensitive substring match against name, description and
    /// address. Empty query matches every profile.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&query);

        contains(&self.name)
            || self.description.as_deref().is_some_and(contains)
            || self.address.as_deref().is_some_and(contains)
    }

    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }
}

pub fn filter_profiles<'a>(profiles: &'a [Profile], query: &str) -> Vec<&'a Profile> {
    profiles
        .iter()
        .filter(|profile| profile.matches_query(query))
        .collect()
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidationError {
    #[error("Name is required.")]
    NameRequired,
}

/// Editable field set of the admin form. Empty string means that the
/// value is not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
}

impl ProfileContent {
    pub fn validate(&self) -> Result<ValidatedProfileContent, ProfileValidationError> {
        let name = non_blank(&self.name).ok_or(ProfileValidationError::NameRequired)?;
        Ok(ValidatedProfileContent {
            name,
            photo: non_blank(&self.photo),
            description: non_blank(&self.description),
            address: non_blank(&self.address),
        })
    }
}

impl From<&Profile> for ProfileContent {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            photo: profile.photo.clone().unwrap_or_default(),
            description: profile.description.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
        }
    }
}

/// Profile fields which are safe to send to the store.
///
/// Only [ProfileContent::validate] creates this, so the name is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProfileContent {
    name: String,
    photo: Option<String>,
    description: Option<String>,
    address: Option<String>,
}

impl ValidatedProfileContent {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}
