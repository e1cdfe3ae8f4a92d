#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

pub mod args;
pub mod file;

use std::{
    net::SocketAddr,
    num::NonZeroU32,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use args::{AppMode, ArgsConfig, ServerModeArgs};
use directory_model::{AvatarUrls, MapSettings};
use error_stack::{Result, ResultExt};
use file::ConfigFile;
use url::Url;

pub use self::file::ConfigFileError;

const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";
const DEFAULT_FIRESTORE_COLLECTION: &str = "profiles";
const DEFAULT_FIRESTORE_PAGE_SIZE: u32 = 300;

const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_GEOCODING_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
/// City scale zoom level
const DEFAULT_MAP_ZOOM: u8 = 13;

const DEFAULT_AVATAR_URL: &str = "https://ui-avatars.com/api/";
const DEFAULT_AVATAR_PLACEHOLDER_URL: &str = "https://via.placeholder.com/";

pub static RUNNING_IN_DEBUG_MODE: GlobalDebugFlag = GlobalDebugFlag {
    debug: AtomicBool::new(false),
};

pub struct GlobalDebugFlag {
    debug: AtomicBool,
}

impl GlobalDebugFlag {
    pub fn value(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GetConfigError {
    #[error("Get working directory error")]
    GetWorkingDir,
    #[error("File loading failed")]
    LoadFileError,

    #[error("Parsing String constant to Url failed.")]
    ConstUrlParsingFailed,

    #[error("Firestore config is required when the in RAM store is not used")]
    FirestoreConfigMissing,
    #[error("In RAM profile store is not allowed when debug mode is off")]
    MemoryStoreNotAllowed,
    #[error("Invalid configuration")]
    InvalidConfiguration,
}

/// Where profiles are stored.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Profiles are lost when the process quits.
    Memory,
    Firestore(FirestoreSettings),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirestoreSettings {
    pub base_url: Url,
    pub project_id: String,
    pub database: String,
    pub collection: String,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
    pub page_size: NonZeroU32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingSettings {
    /// Nominatim compatible search endpoint
    pub url: Url,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    file: ConfigFile,
    public_api: SocketAddr,
    store: StoreBackend,
    geocoding: GeocodingSettings,
    map: MapSettings,
    avatar: AvatarUrls,
    mode: Option<AppMode>,

    /// Semver version of the backend.
    semver_version: String,
}

impl Config {
    pub fn new(
        file: ConfigFile,
        args: ServerModeArgs,
        mode: Option<AppMode>,
        semver_version: String,
    ) -> Result<Self, GetConfigError> {
        let debug = file.general.debug.unwrap_or_default();

        let store = if args.memory_store {
            if !debug {
                return Err(GetConfigError::MemoryStoreNotAllowed)
                    .attach_printable("Enable debug mode from config file to use the in RAM store");
            }
            StoreBackend::Memory
        } else {
            let firestore = file
                .firestore
                .as_ref()
                .ok_or(GetConfigError::FirestoreConfigMissing)?;
            StoreBackend::Firestore(firestore_settings(firestore)?)
        };

        let geocoding = GeocodingSettings {
            url: match file.geocoding.url.clone() {
                Some(url) => url,
                None => Url::parse(DEFAULT_GEOCODING_URL)
                    .change_context(GetConfigError::ConstUrlParsingFailed)?,
            },
            user_agent: file
                .geocoding
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_GEOCODING_USER_AGENT.to_string()),
        };

        if geocoding.user_agent.trim().is_empty() {
            return Err(GetConfigError::InvalidConfiguration)
                .attach_printable("Geocoding user agent is empty");
        }

        let map = MapSettings {
            tile_url: file
                .map
                .tile_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TILE_URL.to_string()),
            attribution: file
                .map
                .attribution
                .clone()
                .unwrap_or_else(|| DEFAULT_TILE_ATTRIBUTION.to_string()),
            zoom: file.map.zoom.unwrap_or(DEFAULT_MAP_ZOOM),
        };

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !map.tile_url.contains(placeholder) {
                return Err(GetConfigError::InvalidConfiguration)
                    .attach_printable(format!("{placeholder} is missing from map tile URL config"));
            }
        }

        let avatar = AvatarUrls::new(
            match file.avatar.url.clone() {
                Some(url) => url,
                None => Url::parse(DEFAULT_AVATAR_URL)
                    .change_context(GetConfigError::ConstUrlParsingFailed)?,
            },
            file.avatar
                .placeholder_url
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR_PLACEHOLDER_URL.to_string()),
        );

        Ok(Self {
            public_api: args.public_api.unwrap_or(file.socket.public_api),
            file,
            store,
            geocoding,
            map,
            avatar,
            mode,
            semver_version,
        })
    }

    /// Server should run in debug mode.
    ///
    /// Debug mode changes:
    /// * In RAM profile store is allowed.
    /// * HTTP requests are traced.
    /// * API errors include details.
    /// * Atomic boolean `RUNNING_IN_DEBUG_MODE` is set to `true`.
    pub fn debug_mode(&self) -> bool {
        self.file.general.debug.unwrap_or(false)
    }

    pub fn log_timestamp(&self) -> bool {
        self.file.general.log_timestamp.unwrap_or(true)
    }

    pub fn public_api(&self) -> SocketAddr {
        self.public_api
    }

    pub fn store(&self) -> &StoreBackend {
        &self.store
    }

    pub fn geocoding(&self) -> &GeocodingSettings {
        &self.geocoding
    }

    pub fn map(&self) -> &MapSettings {
        &self.map
    }

    pub fn avatar(&self) -> &AvatarUrls {
        &self.avatar
    }

    pub fn current_mode(&self) -> Option<&AppMode> {
        self.mode.as_ref()
    }

    pub fn semver_version(&self) -> &str {
        &self.semver_version
    }
}

fn firestore_settings(config: &file::FirestoreConfig) -> Result<FirestoreSettings, GetConfigError> {
    if config.project_id.trim().is_empty() {
        return Err(GetConfigError::InvalidConfiguration)
            .attach_printable("Firestore project ID is empty");
    }

    let base_url = match config.base_url.clone() {
        Some(url) => url,
        None => Url::parse(DEFAULT_FIRESTORE_URL)
            .change_context(GetConfigError::ConstUrlParsingFailed)?,
    };

    if base_url.cannot_be_a_base() {
        return Err(GetConfigError::InvalidConfiguration)
            .attach_printable("Firestore base URL cannot be a base URL");
    }

    Ok(FirestoreSettings {
        base_url,
        project_id: config.project_id.clone(),
        database: config
            .database
            .clone()
            .unwrap_or_else(|| DEFAULT_FIRESTORE_DATABASE.to_string()),
        collection: config
            .collection
            .clone()
            .unwrap_or_else(|| DEFAULT_FIRESTORE_COLLECTION.to_string()),
        api_key: config.api_key.clone(),
        bearer_token: config.bearer_token.clone(),
        page_size: config
            .page_size
            .or(NonZeroU32::new(DEFAULT_FIRESTORE_PAGE_SIZE))
            .unwrap_or(NonZeroU32::MIN),
    })
}

/// Read config file from config directory or current directory.
pub fn get_config(args: ArgsConfig, semver_version: String) -> Result<Config, GetConfigError> {
    let dir: PathBuf = match args.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().change_context(GetConfigError::GetWorkingDir)?,
    };
    let file = ConfigFile::load(dir).change_context(GetConfigError::LoadFileError)?;
    let config = Config::new(file, args.server, args.mode, semver_version)?;

    if config.debug_mode() {
        RUNNING_IN_DEBUG_MODE.debug.store(true, Ordering::Relaxed);
    }

    Ok(config)
}
