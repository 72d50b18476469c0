//! Session configuration loaded from a TOML file.
//!
//! ```toml
//! [client]
//! default_latitude = 40.7812
//! default_longitude = -73.9665
//! profile_config_path = "config/profile"
//!
//! [walk]
//! walking_speed_kmh = 4.8
//! use_walking_speed_variant = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use pacer_core::{Coordinate, CoreError, WalkSettings};

use crate::SessionResult;

fn default_profile_path() -> PathBuf {
    PathBuf::from(".")
}

/// Connection-level settings handed to the client factory.
///
/// `default_*` is where a new client places the avatar; a valid persisted
/// last position overrides latitude and longitude on every reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub default_latitude: f64,
    #[serde(default)]
    pub default_longitude: f64,
    #[serde(default)]
    pub default_altitude: f64,
    /// Directory holding `LastPos.ini`.
    #[serde(default = "default_profile_path")]
    pub profile_config_path: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            default_latitude:    0.0,
            default_longitude:   0.0,
            default_altitude:    0.0,
            profile_config_path: default_profile_path(),
        }
    }
}

impl ClientSettings {
    pub fn default_position(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude, self.default_altitude)
    }
}

/// Everything a session needs that comes from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub walk: WalkSettings,
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> SessionResult<Self> {
        let config: SessionConfig = toml::from_str(text).map_err(CoreError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(CoreError::from)?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded session configuration");
        Ok(config)
    }

    pub fn validate(&self) -> SessionResult<()> {
        self.walk.validate()?;
        Coordinate::try_new(
            self.client.default_latitude,
            self.client.default_longitude,
            self.client.default_altitude,
        )?;
        Ok(())
    }
}
