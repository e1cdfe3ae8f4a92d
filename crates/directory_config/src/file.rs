use std::{net::SocketAddr, num::NonZeroU32, path::Path};

use directory_utils::ContextExt;
use error_stack::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "profile_directory.toml";

pub const DEFAULT_CONFIG_FILE_TEXT: &str = r#"

# [general]
# debug = false
# log_timestamp = true

[socket]
public_api = "127.0.0.1:3000"

# Cloud Firestore REST API. Required unless debug mode is enabled and
# the in RAM profile store is selected from command line.
#
# [firestore]
# project_id = "my-project"
# database = "(default)"        # optional
# collection = "profiles"       # optional
# base_url = "https://firestore.googleapis.com/v1" # optional
# api_key = "key"               # optional
# bearer_token = "token"        # optional
# page_size = 300               # optional

[geocoding]
url = "https://nominatim.openstreetmap.org/search"
# Nominatim usage policy requires identifying the application.
user_agent = "profile-directory/0.1 (admin@example.com)"

# [map]
# tile_url = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
# attribution = "&copy; OpenStreetMap contributors"
# zoom = 13

# [avatar]
# url = "https://ui-avatars.com/api/"
# placeholder_url = "https://via.placeholder.com/"

"#;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigFileError {
    #[error("Writing default config file failed")]
    SaveDefault,
    #[error("Config path is not a directory")]
    NotDirectory,
    #[error("Loading config file failed")]
    LoadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,

    pub socket: SocketConfig,
    pub firestore: Option<FirestoreConfig>,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
}

impl ConfigFile {
    /// Load `profile_directory.toml` from the directory. If the file does
    /// not exist, the default config is written there first.
    pub fn load(dir: impl AsRef<Path>) -> Result<ConfigFile, ConfigFileError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConfigFileError::NotDirectory.report())
                .attach_printable(dir.display().to_string());
        }

        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            std::fs::write(&path, DEFAULT_CONFIG_FILE_TEXT)
                .change_context(ConfigFileError::SaveDefault)
                .attach_printable(path.display().to_string())?;
        }

        let text = std::fs::read_to_string(&path)
            .change_context(ConfigFileError::LoadConfig)
            .attach_printable(path.display().to_string())?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        toml::from_str(text).change_context(ConfigFileError::LoadConfig)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub debug: Option<bool>,
    /// Write timestamp to log messages. Enabled by default.
    pub log_timestamp: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SocketConfig {
    pub public_api: SocketAddr,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub base_url: Option<Url>,
    /// Sent as `key` query parameter.
    pub api_key: Option<String>,
    /// Sent as `Authorization: Bearer` header.
    pub bearer_token: Option<String>,
    pub page_size: Option<NonZeroU32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeocodingConfig {
    pub url: Option<Url>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MapConfig {
    pub tile_url: Option<String>,
    pub attribution: Option<String>,
    pub zoom: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AvatarConfig {
    pub url: Option<Url>,
    pub placeholder_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_file_is_valid() {
        let file = ConfigFile::parse(DEFAULT_CONFIG_FILE_TEXT).unwrap();
        assert_eq!(file.socket.public_api, "127.0.0.1:3000".parse().unwrap());
        assert!(file.firestore.is_none());
        assert!(file.geocoding.user_agent.is_some());
        assert!(file.general.debug.is_none());
    }

    #[test]
    fn firestore_section_is_parsed() {
        let file = ConfigFile::parse(
            r#"
            [socket]
            public_api = "0.0.0.0:8080"

            [firestore]
            project_id = "directory-test"
            api_key = "secret"
            page_size = 50
            "#,
        )
        .unwrap();
        let firestore = file.firestore.unwrap();
        assert_eq!(firestore.project_id, "directory-test");
        assert_eq!(firestore.api_key.as_deref(), Some("secret"));
        assert_eq!(firestore.page_size.map(|v| v.get()), Some(50));
        assert!(firestore.collection.is_none());
    }

    #[test]
    fn missing_socket_section_is_error() {
        assert!(ConfigFile::parse("[general]\ndebug = true\n").is_err());
    }

    fn test_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "profile_directory_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_config_file_is_created_with_defaults() {
        let dir = test_dir("default_config");
        let file = ConfigFile::load(&dir).unwrap();
        let written = std::fs::read_to_string(dir.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_FILE_TEXT);
        assert!(file.firestore.is_none());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn existing_config_file_is_not_overwritten() {
        let dir = test_dir("existing_config");
        let text = "[socket]\npublic_api = \"0.0.0.0:9000\"\n";
        std::fs::write(dir.join(CONFIG_FILE_NAME), text).unwrap();
        let file = ConfigFile::load(&dir).unwrap();
        assert_eq!(file.socket.public_api, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(
            std::fs::read_to_string(dir.join(CONFIG_FILE_NAME)).unwrap(),
            text
        );
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn config_dir_must_be_a_directory() {
        let dir = test_dir("not_directory");
        let path = dir.join("file");
        std::fs::write(&path, "").unwrap();
        let error = ConfigFile::load(&path).unwrap_err();
        assert_eq!(error.current_context(), &ConfigFileError::NotDirectory);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
