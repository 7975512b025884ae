/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the session blob store, the stores and the UI layer.
/// Field names serialize in camelCase (`signTypeId`, `placedBy`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::map::projection::MapBounds;

pub type SignTypeId = u32;
pub type SignId = u32;
pub type LayerId = u32;

/// Name shown for instances whose type no longer resolves
pub const UNKNOWN_TYPE: &str = "Unknown Type";

/// Session-local reference to an image resource (a file path on this machine).
/// Not a durable URL: it is only meaningful for the session that created it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A catalog entry describing a kind of physical sign
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignType {
    pub id: SignTypeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<ImageHandle>,
}

/// Condition of a placed sign
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignStatus {
    #[default]
    #[serde(alias = "İyi")]
    Good,
    #[serde(alias = "Hasarlı")]
    Damaged,
    #[serde(alias = "Kayıp")]
    Missing,
}

impl SignStatus {
    pub const ALL: [SignStatus; 3] = [SignStatus::Good, SignStatus::Damaged, SignStatus::Missing];

    pub fn label(self) -> &'static str {
        match self {
            SignStatus::Good => "Good",
            SignStatus::Damaged => "Damaged",
            SignStatus::Missing => "Missing",
        }
    }
}

impl fmt::Display for SignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One physically placed sign
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignInstance {
    pub id: SignId,
    /// Weak reference into the catalog, resolved at render time
    pub sign_type_id: SignTypeId,
    pub lat: f64,
    pub lng: f64,
    pub placed_by: String,
    pub placed_date: NaiveDate,
    #[serde(default)]
    pub status: SignStatus,
    /// Reserved for the photo attach flow; never populated yet
    #[serde(default)]
    pub photo: Option<ImageHandle>,
}

/// File details captured when an imagery layer is uploaded
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetadata {
    pub filename: String,
    /// Human readable, e.g. "12.4 MB"
    pub size: String,
    pub mime_type: String,
}

/// A georeferenced raster overlay shown on the map widget
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageryLayer {
    pub id: LayerId,
    pub name: String,
    #[serde(default)]
    pub url: Option<ImageHandle>,
    /// Always the site bounds; file georeferencing is not read
    #[serde(default = "MapBounds::site")]
    pub bounds: MapBounds,
    #[serde(default)]
    pub metadata: Option<LayerMetadata>,
    pub visible: bool,
    pub opacity: f32,
    pub upload_date: NaiveDate,
}

/// Next id under the max-plus-one rule (1 for an empty collection).
/// `None` once the largest id is `u32::MAX`.
pub fn next_id(ids: impl Iterator<Item = u32>) -> Option<u32> {
    ids.max().unwrap_or(0).checked_add(1)
}
