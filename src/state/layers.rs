use chrono::{NaiveDate, Utc};

use super::data::{next_id, ImageHandle, ImageryLayer, LayerId, LayerMetadata};
use super::error::ValidationError;
use crate::map::projection::MapBounds;
use crate::media::AttachedFile;

/// Default opacity of a freshly uploaded layer
pub const DEFAULT_OPACITY: f32 = 0.8;

/// Imagery overlays, in insertion order. Layers are never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStore {
    layers: Vec<ImageryLayer>,
}

impl LayerStore {
    pub fn from_layers(layers: Vec<ImageryLayer>) -> Self {
        Self { layers }
    }

    /// Add a layer dated today (UTC). See [`LayerStore::add_on`].
    pub fn add(&mut self, name: &str, file: Option<&AttachedFile>) -> Result<&ImageryLayer, ValidationError> {
        self.add_on(name, file, Utc::now().date_naive())
    }

    /// Add a visible layer backed by an uploaded file.
    ///
    /// The file content is never parsed: bounds are always the site
    /// bounds and only name, size and mime type are recorded.
    pub fn add_on(
        &mut self,
        name: &str,
        file: Option<&AttachedFile>,
        today: NaiveDate,
    ) -> Result<&ImageryLayer, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingLayerName);
        }
        let file = file.ok_or(ValidationError::MissingLayerFile)?;

        let id = next_id(self.layers.iter().map(|l| l.id))
            .ok_or(ValidationError::IdsExhausted("layers"))?;
        self.layers.push(ImageryLayer {
            id,
            name: name.to_string(),
            url: Some(ImageHandle::new(file.path.to_string_lossy())),
            bounds: MapBounds::site(),
            metadata: Some(LayerMetadata {
                filename: file.name.clone(),
                size: file.size_label(),
                mime_type: file.mime_type.clone(),
            }),
            visible: true,
            opacity: DEFAULT_OPACITY,
            upload_date: today,
        });

        tracing::info!(id, name, file = %file.name, "imagery layer added");
        Ok(&self.layers[self.layers.len() - 1])
    }

    /// Flip visibility. Returns false for an unknown id.
    pub fn toggle_visibility(&mut self, id: LayerId) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.visible = !layer.visible;
                tracing::debug!(id, visible = layer.visible, "layer visibility toggled");
                true
            }
            None => {
                tracing::debug!(id, "visibility toggle for unknown layer ignored");
                false
            }
        }
    }

    /// Set opacity, clamped to 0..=1. Non-finite values and unknown
    /// ids leave the store unchanged and return false.
    pub fn set_opacity(&mut self, id: LayerId, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.opacity = value.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    pub fn list(&self) -> &[ImageryLayer] {
        &self.layers
    }

    pub fn visible(&self) -> impl Iterator<Item = &ImageryLayer> {
        self.layers.iter().filter(|l| l.visible)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tif(size_bytes: u64) -> AttachedFile {
        AttachedFile {
            name: "site-august.tif".into(),
            path: PathBuf::from("/data/site-august.tif"),
            size_bytes,
            mime_type: "image/tiff".into(),
        }
    }

    fn layer(store: &LayerStore, id: LayerId) -> &ImageryLayer {
        store.list().iter().find(|l| l.id == id).unwrap()
    }

    fn store_with_one_layer() -> LayerStore {
        let mut store = LayerStore::default();
        store.add_on("August 2024", Some(&tif(1024)), date(2024, 8, 1)).unwrap();
        store
    }

    #[test]
    fn test_add_builds_layer_from_file() {
        let mut store = LayerStore::default();
        let layer = store
            .add_on(" August 2024 ", Some(&tif(13_002_342)), date(2024, 8, 1))
            .unwrap();

        assert_eq!(layer.id, 1);
        assert_eq!(layer.name, "August 2024");
        assert_eq!(layer.url, Some(ImageHandle::new("/data/site-august.tif")));
        assert_eq!(layer.bounds, MapBounds::site());
        assert!(layer.visible);
        assert_eq!(layer.opacity, DEFAULT_OPACITY);
        assert_eq!(layer.upload_date, date(2024, 8, 1));

        let metadata = layer.metadata.as_ref().unwrap();
        assert_eq!(metadata.filename, "site-august.tif");
        assert_eq!(metadata.size, "12.4 MB");
        assert_eq!(metadata.mime_type, "image/tiff");
    }

    #[test]
    fn test_add_requires_name_then_file() {
        let mut store = LayerStore::default();

        assert_eq!(store.add("", Some(&tif(1))), Err(ValidationError::MissingLayerName));
        assert_eq!(store.add("", None), Err(ValidationError::MissingLayerName));
        assert_eq!(store.add("July", None), Err(ValidationError::MissingLayerFile));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_toggle_twice_restores_visibility() {
        let mut store = store_with_one_layer();

        assert!(store.toggle_visibility(1));
        assert!(!layer(&store, 1).visible);
        assert!(store.toggle_visibility(1));
        assert!(layer(&store, 1).visible);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = store_with_one_layer();
        let before = store.clone();
        assert!(!store.toggle_visibility(9));
        assert_eq!(store, before);
    }

    #[test]
    fn test_set_opacity_clamps() {
        let mut store = store_with_one_layer();

        assert!(store.set_opacity(1, 0.3));
        assert_eq!(layer(&store, 1).opacity, 0.3);

        assert!(store.set_opacity(1, 1.7));
        assert_eq!(layer(&store, 1).opacity, 1.0);

        assert!(store.set_opacity(1, -0.2));
        assert_eq!(layer(&store, 1).opacity, 0.0);
    }

    #[test]
    fn test_set_opacity_ignores_nan_and_unknown_ids() {
        let mut store = store_with_one_layer();
        let before = store.clone();

        assert!(!store.set_opacity(1, f32::NAN));
        assert!(!store.set_opacity(5, 0.5));
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_after_max_id_is_rejected() {
        let mut store = store_with_one_layer();
        store.layers[0].id = u32::MAX;
        let before = store.clone();

        assert_eq!(
            store.add_on("September", Some(&tif(1)), date(2024, 9, 1)),
            Err(ValidationError::IdsExhausted("layers"))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_visible_filters_hidden_layers() {
        let mut store = store_with_one_layer();
        store.add_on("September", Some(&tif(1)), date(2024, 9, 1)).unwrap();
        store.toggle_visibility(1);

        let visible: Vec<_> = store.visible().map(|l| l.id).collect();
        assert_eq!(visible, vec![2]);
    }
}
