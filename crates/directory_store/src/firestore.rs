//! Cloud Firestore REST API profile store

use async_trait::async_trait;
use directory_config::FirestoreSettings;
use directory_model::{Profile, ProfileId, ValidatedProfileContent};
use directory_utils::ContextExt;
use error_stack::{Result, ResultExt};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::{
    ProfileStore, StoreError,
    document::{Document, DocumentWrite, ListDocumentsResponse, PROFILE_FIELDS},
};

pub struct FirestoreProfileStore {
    client: reqwest::Client,
    settings: FirestoreSettings,
}

impl FirestoreProfileStore {
    pub fn new(client: reqwest::Client, settings: FirestoreSettings) -> Self {
        Self { client, settings }
    }

    fn collection_url(&self) -> Result<Url, StoreError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::UrlBuilding.report())?
            .pop_if_empty()
            .extend([
                "projects",
                self.settings.project_id.as_str(),
                "databases",
                self.settings.database.as_str(),
                "documents",
                self.settings.collection.as_str(),
            ]);
        Ok(url)
    }

    fn document_url(&self, id: &ProfileId) -> Result<Url, StoreError> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| StoreError::UrlBuilding.report())?
            .push(id.as_str());
        Ok(url)
    }

    /// Request with the configured API key and bearer token.
    fn request(&self, method: Method, mut url: Url) -> RequestBuilder {
        if let Some(key) = &self.settings.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        let builder = self.client.request(method, url);
        match &self.settings.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await.change_context(StoreError::Request)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Err(StoreError::NotFound.report())
        } else if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Status.report())
                .attach_printable(status)
                .attach_printable(body)
        } else {
            Ok(response)
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: Response,
    ) -> Result<T, StoreError> {
        response
            .json()
            .await
            .change_context(StoreError::InvalidResponse)
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let mut profiles = vec![];
        let mut page_token: Option<String> = None;
        loop {
            let mut url = self.collection_url()?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &self.settings.page_size.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self.send(self.request(Method::GET, url)).await?;
            let page: ListDocumentsResponse = Self::read_json(response).await?;
            for document in page.documents {
                profiles.push(document.into_profile()?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Loaded {} profiles", profiles.len());
        Ok(profiles)
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let url = self.document_url(id)?;
        let response = match self.send(self.request(Method::GET, url)).await {
            Ok(response) => response,
            Err(e) if e.current_context() == &StoreError::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let document: Document = Self::read_json(response).await?;
        document.into_profile().map(Some)
    }

    async fn add_profile(
        &self,
        content: &ValidatedProfileContent,
    ) -> Result<ProfileId, StoreError> {
        let url = self.collection_url()?;
        let request = self
            .request(Method::POST, url)
            .json(&DocumentWrite::from(content));
        let response = self.send(request).await?;
        let document: Document = Self::read_json(response).await?;
        let id = document.id()?;
        debug!("Profile {id} created");
        Ok(id)
    }

    async fn update_profile(
        &self,
        id: &ProfileId,
        content: &ValidatedProfileContent,
    ) -> Result<(), StoreError> {
        let mut url = self.document_url(id)?;
        {
            let mut query = url.query_pairs_mut();
            for field in PROFILE_FIELDS {
                query.append_pair("updateMask.fieldPaths", field);
            }
            query.append_pair("currentDocument.exists", "true");
        }
        let request = self
            .request(Method::PATCH, url)
            .json(&DocumentWrite::from(content));
        self.send(request).await?;
        Ok(())
    }

    async fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError> {
        let url = self.document_url(id)?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}
