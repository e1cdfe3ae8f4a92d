//! Firestore REST document JSON

use std::collections::{BTreeMap, HashMap};

use directory_model::{Profile, ProfileId, ValidatedProfileContent};
use directory_utils::ContextExt;
use error_stack::{Result, ResultExt};
use serde::{Deserialize, Serialize};

use crate::StoreError;

pub const FIELD_NAME: &str = "name";
pub const FIELD_PHOTO: &str = "photo";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_ADDRESS: &str = "address";

/// Update mask for full field set replace.
pub const PROFILE_FIELDS: [&str; 4] = [FIELD_NAME, FIELD_PHOTO, FIELD_DESCRIPTION, FIELD_ADDRESS];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    /// Firestore leaves this out when the page is empty.
    #[serde(default)]
    pub documents: Vec<Document>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Document {
    /// For example `projects/p/databases/(default)/documents/profiles/abc`
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    /// Last segment of the resource name.
    pub fn id(&self) -> Result<ProfileId, StoreError> {
        match self.name.rsplit('/').next() {
            Some(id) if !id.is_empty() => Ok(ProfileId::new(id.to_string())),
            _ => Err(StoreError::InvalidResponse.report())
                .attach_printable(format!("Document name: {}", self.name)),
        }
    }

    pub fn into_profile(mut self) -> Result<Profile, StoreError> {
        let id = self.id()?;
        let mut field = |key: &str| self.fields.remove(key).and_then(|v| v.string_value);
        let name = field(FIELD_NAME);
        let photo = field(FIELD_PHOTO);
        let description = field(FIELD_DESCRIPTION);
        let address = field(FIELD_ADDRESS);
        Ok(Profile::from_document_fields(
            id,
            name,
            photo,
            description,
            address,
        ))
    }
}

/// Typed Firestore value. Only strings are used for profiles, other value
/// types deserialize to an empty value.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl Value {
    fn string(value: &str) -> Self {
        Self {
            string_value: Some(value.to_string()),
        }
    }
}

/// Request body for create and update. Missing optional fields are left out
/// so that a masked update removes them from the document.
#[derive(Debug, Serialize)]
pub struct DocumentWrite {
    pub fields: BTreeMap<&'static str, Value>,
}

impl From<&ValidatedProfileContent> for DocumentWrite {
    fn from(content: &ValidatedProfileContent) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(FIELD_NAME, Value::string(content.name()));
        let optional = [
            (FIELD_PHOTO, content.photo()),
            (FIELD_DESCRIPTION, content.description()),
            (FIELD_ADDRESS, content.address()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                fields.insert(key, Value::string(value));
            }
        }
        Self { fields }
    }
}
