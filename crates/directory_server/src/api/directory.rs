use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use directory_model::{ProfileId, RenderState};
use directory_views::{DetailSnapshot, DetailView, DirectorySnapshot, DirectoryView, NavLink};
use serde::Deserialize;

use crate::{app::AppState, utils::Json};

pub const PATH_GET_NAVIGATION: &str = "/api/nav";

/// Top level navigation links.
pub async fn get_navigation() -> Json<Vec<NavLink>> {
    directory_views::navigation().into()
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub const PATH_GET_PROFILES: &str = "/api/profiles";

/// Directory view. The list is loaded from the store for every request
/// and filtered with the optional `q` query parameter.
pub async fn get_profiles(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<DirectorySnapshot> {
    let mut view = DirectoryView::new(state.context().clone());
    view.load().await;
    view.search(&query.q).into()
}

pub const PATH_GET_PROFILE: &str = "/api/profiles/{id}";

/// Detail view with map. The response is sent after map resolution
/// completes.
///
/// Status code 404 is returned with the view if the profile does not exist.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<DetailSnapshot>) {
    let mut view = DetailView::new(state.context().clone(), ProfileId::new(id));
    view.load().await;
    let snapshot = view.settled_snapshot().await;
    let status = if matches!(snapshot.profile, RenderState::Empty) {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, snapshot.into())
}

pub fn directory_router() -> Router<AppState> {
    Router::new()
        .route(PATH_GET_NAVIGATION, get(get_navigation))
        .route(PATH_GET_PROFILES, get(get_profiles))
        .route(PATH_GET_PROFILE, get(get_profile))
}
