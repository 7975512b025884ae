use super::data::{next_id, ImageHandle, SignType, SignTypeId, UNKNOWN_TYPE};
use super::error::ValidationError;

/// The catalog of sign types available for placement.
/// Insertion order is display order. Entries are never edited or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStore {
    types: Vec<SignType>,
}

impl CatalogStore {
    pub fn from_types(types: Vec<SignType>) -> Self {
        Self { types }
    }

    /// Register a new sign type.
    ///
    /// Fails with `MissingName` when the name is empty or whitespace,
    /// leaving the catalog untouched.
    pub fn add(
        &mut self,
        name: &str,
        description: &str,
        image: Option<ImageHandle>,
    ) -> Result<&SignType, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let id = next_id(self.types.iter().map(|t| t.id))
            .ok_or(ValidationError::IdsExhausted("sign types"))?;
        self.types.push(SignType {
            id,
            name: name.to_string(),
            description: description.to_string(),
            image,
        });

        tracing::info!(id, name, "sign type added");
        Ok(&self.types[self.types.len() - 1])
    }

    pub fn list(&self) -> &[SignType] {
        &self.types
    }

    pub fn get(&self, id: SignTypeId) -> Option<&SignType> {
        self.types.iter().find(|t| t.id == id)
    }

    /// Name of the type, or the "Unknown Type" sentinel for dangling ids
    pub fn resolve_name(&self, id: SignTypeId) -> &str {
        self.get(id).map_or(UNKNOWN_TYPE, |t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> CatalogStore {
        CatalogStore::from_types(vec![
            SignType { id: 1, name: "Speed Limit 30".into(), description: String::new(), image: None },
            SignType { id: 4, name: "Stop".into(), description: String::new(), image: None },
        ])
    }

    #[test]
    fn test_add_assigns_max_plus_one() {
        let mut catalog = sample();
        let added = catalog.add("Blasting Zone", "Keep out", None).unwrap();
        assert_eq!(added.id, 5);
        assert_eq!(catalog.list().last().unwrap().name, "Blasting Zone");
    }

    #[test]
    fn test_add_to_empty_catalog_starts_at_one() {
        let mut catalog = CatalogStore::default();
        assert_eq!(catalog.add("First", "", None).unwrap().id, 1);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut catalog = sample();
        let before = catalog.clone();

        assert_eq!(catalog.add("", "x", None), Err(ValidationError::MissingName));
        assert_eq!(catalog.add("   ", "x", None), Err(ValidationError::MissingName));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_image_handle_is_kept() {
        let mut catalog = CatalogStore::default();
        let handle = ImageHandle::new("/tmp/sign.png");
        let added = catalog.add("Helmet Required", "", Some(handle.clone())).unwrap();
        assert_eq!(added.image, Some(handle));
    }

    #[test]
    fn test_resolve_name_falls_back_to_unknown() {
        let catalog = sample();
        assert_eq!(catalog.resolve_name(4), "Stop");
        assert_eq!(catalog.resolve_name(99), UNKNOWN_TYPE);
    }

    #[test]
    fn test_add_after_max_id_is_rejected() {
        let mut catalog = CatalogStore::from_types(vec![SignType {
            id: u32::MAX,
            name: "Stop".into(),
            description: String::new(),
            image: None,
        }]);
        let before = catalog.clone();

        assert_eq!(
            catalog.add("Blasting Zone", "", None),
            Err(ValidationError::IdsExhausted("sign types"))
        );
        assert_eq!(catalog, before);
    }

    proptest! {
        #[test]
        fn prop_ids_strictly_increase(names in proptest::collection::vec("[a-z]{1,8}", 1..20)) {
            let mut catalog = sample();
            let mut last = 4;
            for name in &names {
                let id = catalog.add(name, "", None).unwrap().id;
                prop_assert!(id > last);
                last = id;
            }
            let mut ids: Vec<_> = catalog.list().iter().map(|t| t.id).collect();
            ids.dedup();
            prop_assert_eq!(ids.len(), catalog.len());
        }
    }
}
