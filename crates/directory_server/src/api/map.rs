use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use directory_geocoding::resolve_map;
use directory_model::{MapState, ProfileId};
use directory_views::{MapOverlay, MapOverlaySnapshot};
use serde::Deserialize;
use tracing::error;

use crate::{
    app::AppState,
    utils::{ApiError, Json},
};

pub const PATH_GET_PROFILE_MAP: &str = "/api/profiles/{id}/map";

/// Map overlay for a directory profile.
pub async fn get_profile_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MapOverlaySnapshot>, ApiError> {
    let id = ProfileId::new(id);
    let profile = match state.context().store.get_profile(&id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(StatusCode::NOT_FOUND.into()),
        Err(e) => {
            error!("Loading profile {} for map failed, error: {:?}", id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into());
        }
    };

    let overlay = MapOverlay::open(&profile, state.context());
    Ok(overlay.settled_snapshot().await.into())
}

#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    pub address: Option<String>,
}

pub const PATH_GET_MAP: &str = "/api/map";

/// Resolve free text address. Missing or blank address is not geocoded.
pub async fn get_map(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Json<MapState> {
    let context = state.context();
    resolve_map(
        context.geocoder.as_ref(),
        query.address.as_deref(),
        &context.map_settings,
    )
    .await
    .into()
}

pub fn map_router() -> Router<AppState> {
    Router::new()
        .route(PATH_GET_PROFILE_MAP, get(get_profile_map))
        .route(PATH_GET_MAP, get(get_map))
}
