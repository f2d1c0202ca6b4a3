//! Exercise catalog maintained from the settings view.

use tracing::info;

use crate::error::CatalogError;
use crate::store::{KeyValueStore, RecordStore};

/// Exercise names compare trimmed and case-insensitively everywhere.
pub fn same_exercise(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Append `raw` to the catalog. Returns the stored (trimmed) name.
pub fn add_to_catalog<S: KeyValueStore>(
    store: &RecordStore<S>,
    raw: &str,
) -> Result<String, CatalogError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CatalogError::EmptyName);
    }

    let mut exercises = store.exercises_for_update()?;
    if let Some(existing) = exercises.iter().find(|e| same_exercise(e, name)) {
        return Err(CatalogError::Duplicate(existing.clone()));
    }

    exercises.push(name.to_string());
    store.save_exercises(&exercises)?;
    info!("Added catalog exercise: {}", name);
    Ok(name.to_string())
}

/// Drop `name` from the catalog. Stored workout records keep their copy of
/// the name. Returns false when nothing matched.
pub fn remove_from_catalog<S: KeyValueStore>(
    store: &RecordStore<S>,
    name: &str,
) -> Result<bool, CatalogError> {
    let mut exercises = store.exercises_for_update()?;
    let before = exercises.len();
    exercises.retain(|e| !same_exercise(e, name));
    if exercises.len() == before {
        return Ok(false);
    }
    store.save_exercises(&exercises)?;
    info!("Removed catalog exercise: {}", name);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    fn create_test_store() -> RecordStore<MemoryStore> {
        RecordStore::new(MemoryStore::new(), StorageKeys::default())
    }

    #[test]
    fn test_add_trims_name() {
        let store = create_test_store();
        assert_eq!(add_to_catalog(&store, "  Squat ").unwrap(), "Squat");
        assert_eq!(store.get_exercises(), vec!["Squat".to_string()]);
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let store = create_test_store();
        assert_eq!(add_to_catalog(&store, "   "), Err(CatalogError::EmptyName));
        assert!(store.backend().raw("myhealth_exercises").is_none());
    }

    #[test]
    fn test_add_rejects_duplicate_ignoring_case() {
        let store = create_test_store();
        add_to_catalog(&store, "Bench Press").unwrap();
        assert_eq!(
            add_to_catalog(&store, "bench press"),
            Err(CatalogError::Duplicate("Bench Press".to_string()))
        );
        assert_eq!(store.get_exercises().len(), 1);
    }

    #[test]
    fn test_remove_from_catalog() {
        let store = create_test_store();
        add_to_catalog(&store, "Squat").unwrap();
        add_to_catalog(&store, "Row").unwrap();

        assert!(remove_from_catalog(&store, "SQUAT").unwrap());
        assert_eq!(store.get_exercises(), vec!["Row".to_string()]);
        assert!(!remove_from_catalog(&store, "Squat").unwrap());
    }

    #[test]
    fn test_add_surfaces_write_failure() {
        let store = create_test_store();
        store.backend().set_fail_writes(true);
        assert!(matches!(
            add_to_catalog(&store, "Squat"),
            Err(CatalogError::Storage(_))
        ));
    }

    #[test]
    fn test_add_leaves_corrupt_catalog_untouched() {
        let backend = MemoryStore::new().with_entry("myhealth_exercises", "{oops");
        let store = RecordStore::new(backend, StorageKeys::default());
        assert!(matches!(
            add_to_catalog(&store, "Squat"),
            Err(CatalogError::Storage(StoreError::Corrupt { .. }))
        ));
        assert_eq!(store.backend().raw("myhealth_exercises").unwrap(), "{oops");
    }
}
