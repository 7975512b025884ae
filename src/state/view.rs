/// Transient interaction state
///
/// Nothing in here is persisted: the active tab, in-progress forms,
/// the selected sign and the last known device position all reset
/// when the app restarts.

use std::fmt;

use super::app::AppState;
use super::data::{ImageHandle, ImageryLayer, SignId, SignInstance, SignType, SignTypeId};
use super::error::ValidationError;
use super::instances::Placement;
use crate::map::projection::Coordinate;
use crate::media::AttachedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Map,
    AddSign,
    SignTypes,
    Layers,
    List,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Map, Tab::AddSign, Tab::SignTypes, Tab::Layers, Tab::List];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Map => "Map",
            Tab::AddSign => "Add Sign",
            Tab::SignTypes => "Sign Types",
            Tab::Layers => "Imagery Layers",
            Tab::List => "Sign List",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignTypeForm {
    pub name: String,
    pub description: String,
    pub image: Option<ImageHandle>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementForm {
    pub sign_type_id: Option<SignTypeId>,
    pub lat: String,
    pub lng: String,
    pub placed_by: String,
}

impl PlacementForm {
    /// Empty inputs become `None`; text that is not a number becomes
    /// NaN so it is rejected as an invalid coordinate.
    pub fn to_placement(&self) -> Placement {
        Placement {
            sign_type_id: self.sign_type_id,
            lat: parse_coordinate(&self.lat),
            lng: parse_coordinate(&self.lng),
            placed_by: self.placed_by.clone(),
        }
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse().unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerForm {
    pub name: String,
    pub file: Option<AttachedFile>,
}

/// Option shown in the sign type selector
#[derive(Debug, Clone, PartialEq)]
pub struct SignTypeChoice {
    pub id: SignTypeId,
    pub name: String,
}

impl fmt::Display for SignTypeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub sign_type_form: SignTypeForm,
    pub placement_form: PlacementForm,
    pub layer_form: LayerForm,
    /// Held by id and looked up on every render
    pub selected: Option<SignId>,
    pub user_location: Option<Coordinate>,
}

impl ViewState {
    pub fn submit_sign_type(&mut self, app: &mut AppState) -> Result<SignType, ValidationError> {
        let form = &self.sign_type_form;
        let added = app.add_sign_type(&form.name, &form.description, form.image.clone())?;
        self.sign_type_form = SignTypeForm::default();
        Ok(added)
    }

    pub fn submit_placement(&mut self, app: &mut AppState) -> Result<SignInstance, ValidationError> {
        let placed = app.place_sign(self.placement_form.to_placement())?;
        self.placement_form = PlacementForm::default();
        Ok(placed)
    }

    pub fn submit_layer(&mut self, app: &mut AppState) -> Result<ImageryLayer, ValidationError> {
        let form = &self.layer_form;
        let added = app.add_layer(&form.name, form.file.as_ref())?;
        self.layer_form = LayerForm::default();
        Ok(added)
    }

    /// Remember the device position and prefill the placement form
    pub fn apply_location(&mut self, coord: Coordinate) {
        self.user_location = Some(coord);
        self.placement_form.lat = coord.lat.to_string();
        self.placement_form.lng = coord.lng.to_string();
    }

    pub fn select(&mut self, id: SignId) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected sign as currently stored, if it still exists
    pub fn selected_sign<'a>(&self, app: &'a AppState) -> Option<&'a SignInstance> {
        self.selected.and_then(|id| app.instances().get(id))
    }

    pub fn sign_type_choices(app: &AppState) -> Vec<SignTypeChoice> {
        app.catalog()
            .list()
            .iter()
            .map(|t| SignTypeChoice { id: t.id, name: t.name.clone() })
            .collect()
    }

    pub fn selected_choice(&self, app: &AppState) -> Option<SignTypeChoice> {
        let id = self.placement_form.sign_type_id?;
        app.catalog()
            .get(id)
            .map(|t| SignTypeChoice { id: t.id, name: t.name.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::SignStatus;
    use crate::state::session::MemorySession;
    use std::path::PathBuf;

    fn app() -> AppState {
        AppState::init(Box::new(MemorySession::default()))
    }

    #[test]
    fn test_placement_form_parsing() {
        let form = PlacementForm {
            sign_type_id: Some(1),
            lat: " 39.7611 ".into(),
            lng: "".into(),
            placed_by: "Ali".into(),
        };
        let placement = form.to_placement();
        assert_eq!(placement.lat, Some(39.7611));
        assert_eq!(placement.lng, None);

        let form = PlacementForm { lng: "east".into(), ..form };
        assert!(form.to_placement().lng.unwrap().is_nan());
    }

    #[test]
    fn test_successful_placement_resets_form() {
        let mut app = app();
        let mut view = ViewState::default();
        view.placement_form = PlacementForm {
            sign_type_id: Some(3),
            lat: "39.7601".into(),
            lng: "29.1844".into(),
            placed_by: "Zeynep Arslan".into(),
        };

        let placed = view.submit_placement(&mut app).unwrap();
        assert_eq!(placed.sign_type_id, 3);
        assert_eq!(view.placement_form, PlacementForm::default());
    }

    #[test]
    fn test_failed_placement_keeps_form() {
        let mut app = app();
        let mut view = ViewState::default();
        view.placement_form.lat = "39.76".into();
        view.placement_form.lng = "29.18".into();
        view.placement_form.placed_by = "Ali".into();
        let before = view.clone();

        assert_eq!(view.submit_placement(&mut app), Err(ValidationError::MissingSignType));
        assert_eq!(view, before);
        assert_eq!(app.instances().len(), 4);
    }

    #[test]
    fn test_sign_type_submission() {
        let mut app = app();
        let mut view = ViewState::default();

        assert_eq!(view.submit_sign_type(&mut app), Err(ValidationError::MissingName));

        view.sign_type_form.name = "Dust Zone".into();
        view.sign_type_form.image = Some(ImageHandle::new("/tmp/dust.png"));
        let added = view.submit_sign_type(&mut app).unwrap();
        assert_eq!(added.id, 4);
        assert_eq!(added.image, Some(ImageHandle::new("/tmp/dust.png")));
        assert_eq!(view.sign_type_form, SignTypeForm::default());
    }

    #[test]
    fn test_layer_submission() {
        let mut app = app();
        let mut view = ViewState::default();
        view.layer_form.name = "August 2024".into();

        assert_eq!(view.submit_layer(&mut app), Err(ValidationError::MissingLayerFile));

        view.layer_form.file = Some(AttachedFile {
            name: "aug.tif".into(),
            path: PathBuf::from("/data/aug.tif"),
            size_bytes: 1024,
            mime_type: "image/tiff".into(),
        });
        let added = view.submit_layer(&mut app).unwrap();
        assert_eq!(added.id, 3);
        assert!(view.layer_form.file.is_none());
    }

    #[test]
    fn test_location_prefills_form() {
        let mut view = ViewState::default();
        view.apply_location(Coordinate { lat: 39.7605, lng: 29.1861 });

        assert_eq!(view.user_location, Some(Coordinate { lat: 39.7605, lng: 29.1861 }));
        let placement = view.placement_form.to_placement();
        assert_eq!(placement.lat, Some(39.7605));
        assert_eq!(placement.lng, Some(29.1861));
    }

    #[test]
    fn test_selection_reflects_store_updates() {
        let mut app = app();
        let mut view = ViewState::default();
        view.select(2);

        app.update_sign_status(2, SignStatus::Good);
        assert_eq!(view.selected_sign(&app).unwrap().status, SignStatus::Good);

        view.select(42);
        assert!(view.selected_sign(&app).is_none());
        view.clear_selection();
        assert!(view.selected.is_none());
    }

    #[test]
    fn test_choices_follow_catalog_order() {
        let app = app();
        let names: Vec<_> = ViewState::sign_type_choices(&app).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Speed Limit 30", "Caution: Heavy Machinery", "Mobile Phones Prohibited"]);
    }
}
