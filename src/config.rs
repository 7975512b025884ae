/// Runtime configuration
///
/// Paths default to the user's cache directory:
/// - Linux: ~/.cache/mine-sign-tracker/
/// - macOS: ~/Library/Caches/mine-sign-tracker/
/// - Windows: %LOCALAPPDATA%\mine-sign-tracker\
///
/// Environment overrides:
/// - `SIGN_TRACKER_SESSION_DB` path of the session database, or `:memory:`
/// - `SIGN_TRACKER_LOCATION` device position as `lat,lng`, or `denied`

use std::path::PathBuf;
use thiserror::Error;

use crate::map::projection::{Coordinate, MapBounds};

const APP_DIR: &str = "mine-sign-tracker";
const SESSION_DB_VAR: &str = "SIGN_TRACKER_SESSION_DB";
const LOCATION_VAR: &str = "SIGN_TRACKER_LOCATION";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{var} must be `lat,lng` in decimal degrees, got `{value}`")]
    BadLocation { var: &'static str, value: String },
}

/// Where the session blobs live
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLocation {
    File(PathBuf),
    Memory,
}

/// What the device answers when asked for its position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeviceLocation {
    #[default]
    Absent,
    Denied,
    Fixed(Coordinate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub session: SessionLocation,
    /// Cached sign type image previews
    pub media_dir: PathBuf,
    pub device_location: DeviceLocation,
    pub site_bounds: MapBounds,
}

impl Config {
    /// Build the configuration from the process environment.
    /// Malformed values are logged and replaced by defaults.
    pub fn from_env() -> Self {
        let session = std::env::var(SESSION_DB_VAR).ok();
        let location = std::env::var(LOCATION_VAR).ok();

        let mut config = Self::with_defaults(session.as_deref());
        match location.as_deref().map(str::trim) {
            None | Some("") => {}
            Some("denied") => config.device_location = DeviceLocation::Denied,
            Some(raw) => match parse_location(raw) {
                Ok(coord) => config.device_location = DeviceLocation::Fixed(coord),
                Err(e) => tracing::warn!(error = %e, "ignoring device location override"),
            },
        }
        config
    }

    fn with_defaults(session_override: Option<&str>) -> Self {
        let base = app_cache_dir();
        let session = match session_override {
            Some(":memory:") => SessionLocation::Memory,
            Some(path) if !path.trim().is_empty() => SessionLocation::File(PathBuf::from(path)),
            _ => SessionLocation::File(base.join("session.db")),
        };

        Self {
            session,
            media_dir: base.join("media"),
            device_location: DeviceLocation::Absent,
            site_bounds: MapBounds::site(),
        }
    }
}

/// Cache directory for the app, falling back to the working directory
fn app_cache_dir() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Parse `lat,lng` in decimal degrees
pub fn parse_location(raw: &str) -> Result<Coordinate, ConfigError> {
    let bad = || ConfigError::BadLocation { var: LOCATION_VAR, value: raw.to_string() };

    let (lat, lng) = raw.split_once(',').ok_or_else(bad)?;
    let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
    let lng: f64 = lng.trim().parse().map_err(|_| bad())?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(bad());
    }
    Ok(Coordinate { lat, lng })
}
