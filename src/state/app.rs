use super::catalog::CatalogStore;
use super::data::{ImageHandle, ImageryLayer, LayerId, SignId, SignInstance, SignStatus, SignType};
use super::error::ValidationError;
use super::instances::{InstanceStore, Placement};
use super::layers::LayerStore;
use super::seed;
use super::session::{self, BlobStore, LAYERS_KEY, SIGNS_KEY, SIGN_TYPES_KEY};
use crate::media::AttachedFile;

/// Owns the three stores and the session they are mirrored to.
///
/// Every mutation goes through here so that a store is written back
/// to the session whenever (and only when) it actually changed.
pub struct AppState {
    catalog: CatalogStore,
    instances: InstanceStore,
    layers: LayerStore,
    session: Box<dyn BlobStore>,
}

impl AppState {
    /// Hydrate each store from the session, seeding the ones that are
    /// absent or unreadable.
    pub fn init(session: Box<dyn BlobStore>) -> Self {
        let catalog = CatalogStore::from_types(session::load_or_seed(
            session.as_ref(),
            SIGN_TYPES_KEY,
            seed::sign_types,
        ));
        let instances = InstanceStore::from_signs(session::load_or_seed(
            session.as_ref(),
            SIGNS_KEY,
            seed::signs,
        ));
        let layers = LayerStore::from_layers(session::load_or_seed(
            session.as_ref(),
            LAYERS_KEY,
            seed::layers,
        ));

        tracing::info!(
            sign_types = catalog.len(),
            signs = instances.len(),
            layers = layers.len(),
            "application state initialized"
        );

        let mut state = Self { catalog, instances, layers, session };
        // Mirror the starting point so a reload sees the same data
        state.persist_catalog();
        state.persist_signs();
        state.persist_layers();
        state
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn instances(&self) -> &InstanceStore {
        &self.instances
    }

    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    pub fn add_sign_type(
        &mut self,
        name: &str,
        description: &str,
        image: Option<ImageHandle>,
    ) -> Result<SignType, ValidationError> {
        let added = self.catalog.add(name, description, image)?.clone();
        self.persist_catalog();
        Ok(added)
    }

    pub fn place_sign(&mut self, placement: Placement) -> Result<SignInstance, ValidationError> {
        let placed = self.instances.place(placement)?.clone();
        self.persist_signs();
        Ok(placed)
    }

    pub fn update_sign_status(&mut self, id: SignId, status: SignStatus) {
        if self.instances.update_status(id, status) {
            self.persist_signs();
        }
    }

    pub fn add_layer(
        &mut self,
        name: &str,
        file: Option<&AttachedFile>,
    ) -> Result<ImageryLayer, ValidationError> {
        let added = self.layers.add(name, file)?.clone();
        self.persist_layers();
        Ok(added)
    }

    pub fn toggle_layer(&mut self, id: LayerId) {
        if self.layers.toggle_visibility(id) {
            self.persist_layers();
        }
    }

    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: f32) {
        if self.layers.set_opacity(id, opacity) {
            self.persist_layers();
        }
    }

    fn persist_catalog(&mut self) {
        session::save(self.session.as_mut(), SIGN_TYPES_KEY, self.catalog.list());
    }

    fn persist_signs(&mut self) {
        session::save(self.session.as_mut(), SIGNS_KEY, self.instances.list());
    }

    fn persist_layers(&mut self) {
        session::save(self.session.as_mut(), LAYERS_KEY, self.layers.list());
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("catalog", &self.catalog)
            .field("instances", &self.instances)
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}
