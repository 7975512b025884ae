/// One-shot device location request
///
/// Desktops have no positioning hardware the app can rely on, so the
/// device position comes from configuration. The request is still
/// asynchronous so the UI treats it like any other device capability.

use thiserror::Error;

use crate::config::DeviceLocation;
use crate::map::projection::Coordinate;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Location access was denied. Please enable location access.")]
    PermissionDenied,
    #[error("Could not get location: {0}")]
    Unavailable(String),
}

/// Ask the device for its current position.
/// No timeout and no retry; the caller reports failures once.
pub async fn request_location(device: DeviceLocation) -> Result<Coordinate, LocationError> {
    tokio::task::yield_now().await;

    match device {
        DeviceLocation::Fixed(coord) => {
            tracing::info!(lat = coord.lat, lng = coord.lng, "device location acquired");
            Ok(coord)
        }
        DeviceLocation::Denied => {
            tracing::debug!("device location permission denied");
            Err(LocationError::PermissionDenied)
        }
        DeviceLocation::Absent => {
            tracing::debug!("device location requested but none is configured");
            Err(LocationError::Unavailable(
                "no positioning source is configured for this device".to_string(),
            ))
        }
    }
}
