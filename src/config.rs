//! Configuration constants and profile loading for artline
//!
//! Connection settings live in an INI profile file, one section per profile:
//!
//! ```ini
//! [default]
//! server = https://api.harvardartmuseums.org
//! apikey = 00000000-0000-0000-0000-000000000000
//! timeout = 30
//! facet_refresh = startup
//! ```

use crate::gallery::FacetRefresh;
use ini::Ini;
use std::time::Duration;
use url::Url;

/// Default profile file path for artline
pub const DEFAULT_PROFILE_PATH: &str = "~/.artline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "ARTLINE_PROFILE_PATH";

/// Environment variable name for overriding the profile's API key
pub const API_KEY_ENV_VAR: &str = "ARTLINE_API_KEY";

/// Environment variable holding the log filter
pub const LOG_LEVEL_ENV_VAR: &str = "ARTLINE_LOG_LEVEL";

/// Catalog server used when a profile does not name one
pub const DEFAULT_SERVER: &str = "https://api.harvardartmuseums.org";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read profile file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: ini::Error,
    },

    #[error("profile '{profile}': invalid server URL '{value}': {source}")]
    InvalidServer {
        profile: String,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("profile '{profile}': invalid {key} '{value}': {reason}")]
    InvalidValue {
        profile: String,
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for a catalog server
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProfile {
    server: Url,
    api_key: Option<String>,
    timeout: Option<Duration>,
    facet_refresh: FacetRefresh,
}

impl CatalogProfile {
    pub fn new(server: Url, api_key: Option<String>) -> Self {
        Self {
            server,
            api_key,
            timeout: None,
            facet_refresh: FacetRefresh::default(),
        }
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn facet_refresh(&self) -> FacetRefresh {
        self.facet_refresh
    }

    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key;
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn set_facet_refresh(&mut self, facet_refresh: FacetRefresh) {
        self.facet_refresh = facet_refresh;
    }
}

/// Profile pointing at the default server without credentials
pub fn get_blank_profile() -> Result<CatalogProfile, ConfigError> {
    let server = Url::parse(DEFAULT_SERVER).map_err(|source| ConfigError::InvalidServer {
        profile: "(blank)".to_string(),
        value: DEFAULT_SERVER.to_string(),
        source,
    })?;
    Ok(CatalogProfile::new(server, None))
}

/// Profiles stored in an INI file
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    /// Create a store for a path; `~` is expanded
    pub fn new(path: &str) -> Self {
        Self {
            path: shellexpand::tilde(path).into_owned(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Load a named profile. A missing file or section yields `Ok(None)`.
    pub fn get_profile(&self, name: &str) -> Result<Option<CatalogProfile>, ConfigError> {
        let ini = match Ini::load_from_file(&self.path) {
            Ok(ini) => ini,
            Err(ini::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Profile file '{}' does not exist", self.path);
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let mut profile = get_blank_profile()?;

        if let Some(value) = section.get("server") {
            let server = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidServer {
                profile: name.to_string(),
                value: value.to_string(),
                source,
            })?;
            profile.server = server;
        }

        profile.api_key = section
            .get("apikey")
            .or_else(|| section.get("api_key"))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Some(value) = section.get("timeout") {
            let seconds: u64 = value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    profile: name.to_string(),
                    key: "timeout",
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
            profile.timeout = Some(Duration::from_secs(seconds));
        }

        if let Some(value) = section.get("facet_refresh") {
            profile.facet_refresh =
                value
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        profile: name.to_string(),
                        key: "facet_refresh",
                        value: value.to_string(),
                        reason,
                    })?;
        }

        Ok(Some(profile))
    }
}

/// Load a profile by name, falling back to the blank profile, then apply the
/// API key override from the environment.
pub fn load_profile(name: &str, path: &str) -> Result<CatalogProfile, ConfigError> {
    tracing::debug!("Loading profile '{}' from '{}'", name, path);

    let store = IniProfileStore::new(path);
    let mut profile = match store.get_profile(name)? {
        Some(profile) => {
            tracing::debug!("Profile loaded successfully, server: {}", profile.server());
            profile
        }
        None => {
            tracing::debug!("Profile '{}' not found, using blank profile", name);
            get_blank_profile()?
        }
    };

    if let Some(key) = std::env::var_os(API_KEY_ENV_VAR).and_then(|val| val.into_string().ok()) {
        tracing::debug!("Using API key from {}", API_KEY_ENV_VAR);
        profile.set_api_key(Some(key));
    }

    if profile.api_key().is_none() {
        tracing::warn!(
            "No API key configured; set 'apikey' in the profile or {}",
            API_KEY_ENV_VAR
        );
    }

    Ok(profile)
}
