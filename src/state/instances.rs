use chrono::{NaiveDate, Utc};

use super::data::{next_id, SignId, SignInstance, SignStatus, SignTypeId};
use super::error::ValidationError;

/// Raw values collected by the placement form.
/// `None` means the field was left empty (or did not parse).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub sign_type_id: Option<SignTypeId>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub placed_by: String,
}

/// The set of placed signs, in insertion order. Signs are never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceStore {
    signs: Vec<SignInstance>,
}

impl InstanceStore {
    pub fn from_signs(signs: Vec<SignInstance>) -> Self {
        Self { signs }
    }

    /// Place a new sign dated today (UTC). See [`InstanceStore::place_on`].
    pub fn place(&mut self, placement: Placement) -> Result<&SignInstance, ValidationError> {
        self.place_on(placement, Utc::now().date_naive())
    }

    /// Place a new sign with status `Good` and the given placement date.
    ///
    /// All four fields must be present. The sign type id is not checked
    /// against the catalog; dangling ids render as "Unknown Type".
    pub fn place_on(
        &mut self,
        placement: Placement,
        today: NaiveDate,
    ) -> Result<&SignInstance, ValidationError> {
        let sign_type_id = placement.sign_type_id.ok_or(ValidationError::MissingSignType)?;
        let (lat, lng) = match (placement.lat, placement.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(ValidationError::MissingCoordinates),
        };
        if !valid_coordinate(lat, lng) {
            return Err(ValidationError::InvalidCoordinate);
        }
        let placed_by = placement.placed_by.trim();
        if placed_by.is_empty() {
            return Err(ValidationError::MissingPlacedBy);
        }

        let id = next_id(self.signs.iter().map(|s| s.id))
            .ok_or(ValidationError::IdsExhausted("signs"))?;
        self.signs.push(SignInstance {
            id,
            sign_type_id,
            lat,
            lng,
            placed_by: placed_by.to_string(),
            placed_date: today,
            status: SignStatus::Good,
            photo: None,
        });

        tracing::info!(id, sign_type_id, lat, lng, "sign placed");
        Ok(&self.signs[self.signs.len() - 1])
    }

    /// Replace the status of one sign.
    /// Returns false (and changes nothing) when the id is unknown.
    pub fn update_status(&mut self, id: SignId, status: SignStatus) -> bool {
        match self.signs.iter_mut().find(|s| s.id == id) {
            Some(sign) => {
                sign.status = status;
                tracing::info!(id, %status, "sign status updated");
                true
            }
            None => {
                tracing::debug!(id, "status update for unknown sign ignored");
                false
            }
        }
    }

    pub fn list(&self) -> &[SignInstance] {
        &self.signs
    }

    pub fn get(&self, id: SignId) -> Option<&SignInstance> {
        self.signs.iter().find(|s| s.id == id)
    }

    pub fn count_by_status(&self, status: SignStatus) -> usize {
        self.signs.iter().filter(|s| s.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }
}

fn valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sign(id: SignId, status: SignStatus) -> SignInstance {
        SignInstance {
            id,
            sign_type_id: 1,
            lat: 39.76,
            lng: 29.185,
            placed_by: "Ahmet Yılmaz".into(),
            placed_date: date(2024, 7, 25),
            status,
            photo: None,
        }
    }

    fn full_placement() -> Placement {
        Placement {
            sign_type_id: Some(2),
            lat: Some(39.7615),
            lng: Some(29.1880),
            placed_by: "Test User".into(),
        }
    }

    #[test]
    fn test_place_sets_defaults() {
        let mut store = InstanceStore::from_signs(vec![sign(1, SignStatus::Missing)]);
        let placed = store.place_on(full_placement(), date(2026, 10, 18)).unwrap();

        assert_eq!(placed.id, 2);
        assert_eq!(placed.status, SignStatus::Good);
        assert_eq!(placed.placed_date, date(2026, 10, 18));
        assert_eq!(placed.placed_by, "Test User");
        assert!(placed.photo.is_none());
    }

    #[test]
    fn test_place_uses_todays_date() {
        let mut store = InstanceStore::default();
        let today = Utc::now().date_naive();
        let placed = store.place(full_placement()).unwrap();
        // Tolerate a midnight rollover between the two clock reads
        assert!(placed.placed_date >= today);
    }

    #[test]
    fn test_place_accepts_unknown_type_id() {
        let mut store = InstanceStore::default();
        let placement = Placement { sign_type_id: Some(42), ..full_placement() };
        assert_eq!(store.place(placement).unwrap().sign_type_id, 42);
    }

    #[test]
    fn test_zero_coordinates_count_as_present() {
        let mut store = InstanceStore::default();
        let placement = Placement { lat: Some(0.0), lng: Some(0.0), ..full_placement() };
        assert!(store.place(placement).is_ok());
    }

    #[test]
    fn test_missing_fields_leave_store_unchanged() {
        let mut store = InstanceStore::from_signs(vec![sign(1, SignStatus::Good)]);
        let before = store.clone();

        let cases = [
            (Placement { sign_type_id: None, ..full_placement() }, ValidationError::MissingSignType),
            (Placement { lat: None, ..full_placement() }, ValidationError::MissingCoordinates),
            (Placement { lng: None, ..full_placement() }, ValidationError::MissingCoordinates),
            (Placement { placed_by: "  ".into(), ..full_placement() }, ValidationError::MissingPlacedBy),
            (Placement { lat: Some(91.0), ..full_placement() }, ValidationError::InvalidCoordinate),
            (Placement { lng: Some(f64::NAN), ..full_placement() }, ValidationError::InvalidCoordinate),
        ];

        for (placement, expected) in cases {
            assert_eq!(store.place(placement).unwrap_err(), expected);
            assert_eq!(store, before);
        }
    }

    #[test]
    fn test_place_after_max_id_is_rejected() {
        let mut store = InstanceStore::from_signs(vec![sign(u32::MAX, SignStatus::Good)]);
        let before = store.clone();

        assert_eq!(
            store.place_on(full_placement(), date(2026, 1, 1)),
            Err(ValidationError::IdsExhausted("signs"))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_update_status_touches_only_target() {
        let mut store = InstanceStore::from_signs(vec![
            sign(1, SignStatus::Good),
            sign(2, SignStatus::Good),
        ]);

        assert!(store.update_status(2, SignStatus::Damaged));
        assert_eq!(store.get(1).unwrap(), &sign(1, SignStatus::Good));
        assert_eq!(store.get(2).unwrap(), &sign(2, SignStatus::Damaged));
    }

    #[test]
    fn test_update_status_unknown_id_is_noop() {
        let mut store = InstanceStore::from_signs(vec![sign(1, SignStatus::Good)]);
        let before = store.clone();

        assert!(!store.update_status(7, SignStatus::Missing));
        assert_eq!(store, before);
    }

    #[test]
    fn test_count_by_status() {
        let store = InstanceStore::from_signs(vec![
            sign(1, SignStatus::Good),
            sign(2, SignStatus::Damaged),
            sign(3, SignStatus::Good),
        ]);
        assert_eq!(store.count_by_status(SignStatus::Good), 2);
        assert_eq!(store.count_by_status(SignStatus::Damaged), 1);
        assert_eq!(store.count_by_status(SignStatus::Missing), 0);
    }

    proptest! {
        #[test]
        fn prop_ids_follow_max_plus_one(seed_ids in proptest::collection::btree_set(1u32..500, 0..10), adds in 1usize..10) {
            let seeded: Vec<_> = seed_ids.iter().map(|&id| sign(id, SignStatus::Good)).collect();
            let mut store = InstanceStore::from_signs(seeded);
            let mut expected = seed_ids.iter().max().copied().unwrap_or(0) + 1;

            for _ in 0..adds {
                let id = store.place_on(full_placement(), date(2026, 1, 1)).unwrap().id;
                prop_assert_eq!(id, expected);
                expected += 1;
            }
        }
    }
}
