use std::sync::Arc;

use directory_config::Config;
use directory_geocoding::create_geocoder;
use directory_store::create_store;
use directory_views::{AdminPanel, SharedAdminPanel, ViewContext};
use error_stack::{Result, ResultExt};

use crate::ServerError;

/// Router state
#[derive(Clone)]
pub struct AppState {
    context: ViewContext,
    admin: Arc<SharedAdminPanel>,
}

impl AppState {
    pub fn new(context: ViewContext) -> Self {
        Self {
            admin: Arc::new(SharedAdminPanel::new(AdminPanel::new(context.clone()))),
            context,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        Ok(Self::new(create_view_context(config)?))
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    pub fn admin(&self) -> &SharedAdminPanel {
        &self.admin
    }
}

pub fn create_view_context(config: &Config) -> Result<ViewContext, ServerError> {
    Ok(ViewContext {
        store: create_store(config).change_context(ServerError::StoreInit)?,
        geocoder: create_geocoder(config.geocoding()).change_context(ServerError::GeocoderInit)?,
        map_settings: Arc::new(config.map().clone()),
        avatars: Arc::new(config.avatar().clone()),
    })
}
