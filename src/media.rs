/// Local file attachments
///
/// This module handles:
/// - Inspecting files picked for imagery layers and sign types
/// - Caching small previews of sign type images
///
/// TIFF imagery is referenced by path only, never decoded.

use chrono::Utc;
use image::imageops::FilterType;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::state::data::ImageHandle;

/// Size of cached sign type previews (square bound)
const PREVIEW_SIZE: u32 = 256;

/// Extensions offered by the imagery layer picker
pub const LAYER_EXTENSIONS: [&str; 3] = ["tif", "tiff", "geotiff"];

/// Extensions offered by the sign type image picker
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not process image: {0}")]
    Image(#[from] image::ImageError),
    #[error("background task failed: {0}")]
    Join(String),
}

/// A file picked by the user
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedFile {
    /// Filename only (e.g., "site-july.tif")
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl AttachedFile {
    /// Read name, size and mime type from the filesystem
    pub fn from_path(path: &Path) -> Result<Self, MediaError> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            name,
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            mime_type: mime_type_for(path).to_string(),
        })
    }

    /// Size in megabytes with one decimal, e.g. "12.4 MB".
    /// Halves round up, so 1.25 MB reads "1.3 MB".
    pub fn size_label(&self) -> String {
        let megabytes = self.size_bytes as f64 / 1024.0 / 1024.0;
        format!("{:.1} MB", (megabytes * 10.0).round() / 10.0)
    }
}

/// Mime type guessed from the extension. The picker filter is advisory,
/// so anything unrecognised is reported as a generic binary.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "tif" | "tiff" | "geotiff" => "image/tiff",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Cache a small preview of a sign type image and return its handle.
/// Runs on a blocking thread because decoding is CPU-bound.
/// Falls back to the source file when it cannot be decoded.
pub async fn cache_preview(source: PathBuf, media_dir: PathBuf) -> ImageHandle {
    let fallback = ImageHandle::new(source.to_string_lossy());

    let result = tokio::task::spawn_blocking(move || cache_preview_blocking(&source, &media_dir))
        .await
        .map_err(|e| MediaError::Join(e.to_string()))
        .and_then(|r| r);

    match result {
        Ok(path) => ImageHandle::new(path.to_string_lossy()),
        Err(e) => {
            tracing::warn!(error = %e, "preview caching failed, using source image");
            fallback
        }
    }
}

/// Blocking implementation of preview caching
fn cache_preview_blocking(source: &Path, media_dir: &Path) -> Result<PathBuf, MediaError> {
    fs::create_dir_all(media_dir)?;

    let img = image::open(source)?;
    let preview = img.resize(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Lanczos3);

    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let preview_path = media_dir.join(format!("sign-{}.png", stamp));
    preview.save(&preview_path)?;

    tracing::debug!(path = %preview_path.display(), "cached sign image preview");
    Ok(preview_path)
}
