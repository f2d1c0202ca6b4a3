use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::backend::KeyValueStore;
use super::types::{RecordId, WorkoutRecord};
use crate::config::StorageKeys;
use crate::error::StoreError;

/// Result of reading one collection. Corrupt content is reported separately
/// from a missing key, but both degrade to an empty collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Absent,
    Corrupt(String),
    Loaded(T),
}

impl<T: Default> LoadOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            LoadOutcome::Loaded(value) => value,
            LoadOutcome::Absent | LoadOutcome::Corrupt(_) => T::default(),
        }
    }
}

/// Accessor for the exercise catalog and workout record collections.
pub struct RecordStore<S> {
    backend: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(backend: S, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> LoadOutcome<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored data under {}", key);
                return LoadOutcome::Absent;
            }
            Err(e) => {
                warn!("{}", e);
                return LoadOutcome::Corrupt(e.to_string());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => LoadOutcome::Loaded(value),
            Err(e) => {
                warn!("Stored data under {} is malformed, treating as empty: {}", key, e);
                LoadOutcome::Corrupt(e.to_string())
            }
        }
    }

    fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|e| StoreError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.backend.set_item(key, &json)
    }

    pub fn load_exercises(&self) -> LoadOutcome<Vec<String>> {
        self.load(&self.keys.exercises)
    }

    pub fn load_records(&self) -> LoadOutcome<Vec<WorkoutRecord>> {
        self.load(&self.keys.records)
    }

    /// The exercise catalog, or empty when absent or malformed.
    pub fn get_exercises(&self) -> Vec<String> {
        self.load_exercises().into_value()
    }

    /// All workout records, or empty when absent or malformed.
    pub fn get_records(&self) -> Vec<WorkoutRecord> {
        self.load_records().into_value()
    }

    /// Current content of `key` for a read-modify-write. Unlike the plain
    /// getters, malformed content is an error.
    fn load_for_update<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.load(key) {
            LoadOutcome::Loaded(value) => Ok(value),
            LoadOutcome::Absent => Ok(T::default()),
            LoadOutcome::Corrupt(reason) => Err(StoreError::Corrupt {
                key: key.to_string(),
                reason,
            }),
        }
    }

    /// The catalog for modification. Fails on malformed content.
    pub fn exercises_for_update(&self) -> Result<Vec<String>, StoreError> {
        self.load_for_update(&self.keys.exercises)
    }

    /// Overwrite the catalog in a single write.
    pub fn save_exercises(&self, exercises: &[String]) -> Result<(), StoreError> {
        self.store(&self.keys.exercises, exercises)?;
        info!("Saved {} catalog exercises", exercises.len());
        Ok(())
    }

    /// Extend the record collection in a single write.
    pub fn append_records(&self, records: &[WorkoutRecord]) -> Result<(), StoreError> {
        let mut all: Vec<WorkoutRecord> = self.load_for_update(&self.keys.records)?;
        all.extend_from_slice(records);
        self.store(&self.keys.records, &all)?;
        info!("Appended {} records ({} stored)", records.len(), all.len());
        Ok(())
    }

    /// Remove the record with `id`. Returns false, without writing, when no
    /// record matched.
    pub fn delete_record(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut all: Vec<WorkoutRecord> = self.load_for_update(&self.keys.records)?;
        let before = all.len();
        all.retain(|r| r.id != id);
        if all.len() == before {
            info!("Record {} not found", id);
            return Ok(false);
        }
        self.store(&self.keys.records, &all)?;
        info!("Deleted record {}", id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SetEntry};
    use chrono::NaiveDate;

    fn create_test_store() -> RecordStore<MemoryStore> {
        RecordStore::new(MemoryStore::new(), StorageKeys::default())
    }

    fn make_record(id: u64, exercise: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: RecordId::from(id),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            exercise: exercise.to_string(),
            sets: vec![SetEntry::new(50.0, 5.0)],
        }
    }

    #[test]
    fn test_absent_collections_are_empty() {
        let store = create_test_store();
        assert_eq!(store.load_exercises(), LoadOutcome::Absent);
        assert!(store.get_exercises().is_empty());
        assert!(store.get_records().is_empty());
    }

    #[test]
    fn test_malformed_content_is_reported_as_corrupt() {
        let backend = MemoryStore::new()
            .with_entry("myhealth_exercises", "{oops")
            .with_entry("myhealth_records", r#"{"not":"an array"}"#);
        let store = RecordStore::new(backend, StorageKeys::default());

        assert!(matches!(store.load_exercises(), LoadOutcome::Corrupt(_)));
        assert!(matches!(store.load_records(), LoadOutcome::Corrupt(_)));
        assert!(store.get_exercises().is_empty());
        assert!(store.get_records().is_empty());
    }

    #[test]
    fn test_save_and_load_exercises() {
        let store = create_test_store();
        let list = vec!["Squat".to_string(), "Bench Press".to_string()];
        store.save_exercises(&list).unwrap();

        assert_eq!(store.get_exercises(), list);
        assert_eq!(
            store.backend().raw("myhealth_exercises").unwrap(),
            r#"["Squat","Bench Press"]"#
        );
    }

    #[test]
    fn test_append_records_extends_collection() {
        let store = create_test_store();
        store.append_records(&[make_record(1, "Squat")]).unwrap();
        store
            .append_records(&[make_record(2, "Deadlift"), make_record(3, "Row")])
            .unwrap();

        let ids: Vec<RecordId> = store.get_records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RecordId::from(1u64), RecordId::from(2u64), RecordId::from(3u64)]);
    }

    #[test]
    fn test_append_keeps_corrupt_collection() {
        let backend = MemoryStore::new().with_entry("myhealth_records", "garbage");
        let store = RecordStore::new(backend, StorageKeys::default());

        let err = store.append_records(&[make_record(7, "Squat")]).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(store.backend().raw("myhealth_records").unwrap(), "garbage");
    }

    #[test]
    fn test_delete_keeps_corrupt_collection() {
        let backend = MemoryStore::new().with_entry("myhealth_records", r#"[{"id":"x"}]"#);
        let store = RecordStore::new(backend, StorageKeys::default());

        assert!(store.delete_record(RecordId::from(1u64)).is_err());
        assert_eq!(store.backend().raw("myhealth_records").unwrap(), r#"[{"id":"x"}]"#);
    }

    #[test]
    fn test_fractional_ids_load_and_delete() {
        let raw = r#"[{"id":1704067200000.4321,"date":"2024-01-01","exercise":"Squat","sets":[{"weight":100,"reps":5}]}]"#;
        let backend = MemoryStore::new().with_entry("myhealth_records", raw);
        let store = RecordStore::new(backend, StorageKeys::default());

        let records = store.get_records();
        assert_eq!(records.len(), 1);

        store.append_records(&[make_record(2, "Row")]).unwrap();
        assert_eq!(store.get_records().len(), 2);

        let id = RecordId::parse(&records[0].id.to_string()).unwrap();
        assert!(store.delete_record(id).unwrap());
        let left = store.get_records();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].exercise, "Row");
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let store = create_test_store();
        store.backend().set_fail_writes(true);
        let err = store.save_exercises(&["Squat".to_string()]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(store.get_exercises().is_empty());
    }

    #[test]
    fn test_delete_present_record() {
        let store = create_test_store();
        store
            .append_records(&[make_record(1, "Squat"), make_record(2, "Row")])
            .unwrap();

        assert!(store.delete_record(RecordId::from(1u64)).unwrap());
        let records = store.get_records();
        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| r.id != RecordId::from(1u64)));
    }

    #[test]
    fn test_delete_missing_record() {
        let store = create_test_store();
        store.append_records(&[make_record(1, "Squat")]).unwrap();

        assert!(!store.delete_record(RecordId::from(99u64)).unwrap());
        assert_eq!(store.get_records().len(), 1);
    }
}
