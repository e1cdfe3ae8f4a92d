use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use directory_model::{ProfileContent, ProfileId};
use directory_views::AdminSnapshot;
use serde::Deserialize;

use crate::{
    app::AppState,
    utils::{ApiError, Json},
};

pub const PATH_GET_ADMIN: &str = "/api/admin";

/// Admin panel state. The profile list is loaded on first access.
pub async fn get_admin(State(state): State<AppState>) -> Json<AdminSnapshot> {
    state.admin().load_if_needed().await.into()
}

pub const PATH_POST_ADMIN_RELOAD: &str = "/api/admin/reload";

pub async fn post_admin_reload(
    State(state): State<AppState>,
) -> Result<Json<AdminSnapshot>, ApiError> {
    Ok(state.admin().reload().await?.into())
}

pub const PATH_POST_ADMIN_EDIT: &str = "/api/admin/edit/{id}";

/// Load profile to the admin form for editing.
pub async fn post_admin_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminSnapshot>, ApiError> {
    Ok(state.admin().edit(&ProfileId::new(id)).await?.into())
}

pub const PATH_POST_ADMIN_CANCEL: &str = "/api/admin/cancel";

pub async fn post_admin_cancel(
    State(state): State<AppState>,
) -> Result<Json<AdminSnapshot>, ApiError> {
    Ok(state.admin().cancel_edit().await?.into())
}

pub const PATH_POST_ADMIN_SUBMIT: &str = "/api/admin/submit";

/// Add new profile or update the profile which is being edited.
///
/// Validation and store errors are part of the returned state.
pub async fn post_admin_submit(
    State(state): State<AppState>,
    Json(content): Json<ProfileContent>,
) -> Result<Json<AdminSnapshot>, ApiError> {
    Ok(state.admin().submit(content).await?.into())
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

pub const PATH_DELETE_ADMIN_PROFILE: &str = "/api/admin/profiles/{id}";

/// Delete profile. Without `confirm=true` status code 428 is returned with
/// the confirmation prompt.
pub async fn delete_admin_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<AdminSnapshot>, ApiError> {
    Ok(state
        .admin()
        .delete(&ProfileId::new(id), query.confirm)
        .await?
        .into())
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(PATH_GET_ADMIN, get(get_admin))
        .route(PATH_POST_ADMIN_RELOAD, post(post_admin_reload))
        .route(PATH_POST_ADMIN_EDIT, post(post_admin_edit))
        .route(PATH_POST_ADMIN_CANCEL, post(post_admin_cancel))
        .route(PATH_POST_ADMIN_SUBMIT, post(post_admin_submit))
        .route(PATH_DELETE_ADMIN_PROFILE, delete(delete_admin_profile))
}
