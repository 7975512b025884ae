/// Error types for the state layer
///
/// Validation errors are shown to the user as-is, so their
/// `Display` text is the message the user reads. Session errors
/// are only ever logged.

use thiserror::Error;

/// A form submission was rejected; nothing was mutated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a sign type name.")]
    MissingName,
    #[error("Please select a sign type.")]
    MissingSignType,
    #[error("Please enter both latitude and longitude.")]
    MissingCoordinates,
    #[error("Coordinates are out of range (latitude -90..90, longitude -180..180).")]
    InvalidCoordinate,
    #[error("Please enter who placed the sign.")]
    MissingPlacedBy,
    #[error("Please enter a layer name!")]
    MissingLayerName,
    #[error("Please select a TIF file!")]
    MissingLayerFile,
    #[error("No more ids are available for new {0}.")]
    IdsExhausted(&'static str),
}

/// Failure reading from or writing to the session blob store
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("session blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session store is unavailable: {0}")]
    Unavailable(String),
}
