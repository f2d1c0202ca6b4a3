use chrono::NaiveDate;
use proptest::prelude::*;

use liftlog_core::catalog::add_to_catalog;
use liftlog_core::render::render_session;
use liftlog_core::{CommitError, MemoryStore, RecordStore, SessionEditor, SetEntry, SetField, StorageKeys, StoreError};

const NOW_MS: u64 = 1_704_067_200_000;

fn create_test_store() -> RecordStore<MemoryStore> {
    RecordStore::new(MemoryStore::new(), StorageKeys::default())
}

#[test]
fn test_bench_press_scenario_commits_one_record() {
    let store = create_test_store();
    add_to_catalog(&store, "Bench Press").unwrap();

    let mut editor = SessionEditor::new();
    let name = store.get_exercises()[0].clone();
    editor.add_exercise(&name).unwrap();
    assert_eq!(editor.records()[0].sets, vec![SetEntry::new(0.0, 0.0)]);

    editor.update_set(0, 0, SetField::Weight, "50").unwrap();
    editor.update_set(0, 0, SetField::Reps, "5").unwrap();

    assert_eq!(editor.commit("2024-01-01", &store, NOW_MS), Ok(1));

    let records = store.get_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(records[0].exercise, "Bench Press");
    assert_eq!(records[0].sets, vec![SetEntry::new(50.0, 5.0)]);
    assert!(editor.is_empty());
    assert!(!render_session(&editor).show_commit);
}

#[test]
fn test_unfilled_set_blocks_commit() {
    let store = create_test_store();
    add_to_catalog(&store, "Bench Press").unwrap();

    let mut editor = SessionEditor::new();
    editor.add_exercise("Bench Press").unwrap();

    assert_eq!(
        editor.commit("2024-01-01", &store, NOW_MS),
        Err(CommitError::InvalidSet {
            exercise: "Bench Press".to_string(),
            set: 1
        })
    );
    assert!(store.get_records().is_empty());
    assert!(store.backend().raw("myhealth_records").is_none());
    assert_eq!(editor.records().len(), 1);
    assert_eq!(editor.records()[0].sets, vec![SetEntry::new(0.0, 0.0)]);
}

#[test]
fn test_commit_appends_to_existing_records() {
    let store = create_test_store();
    let mut editor = SessionEditor::new();
    editor.add_exercise("Squat").unwrap();
    editor.update_set(0, 0, SetField::Weight, "100").unwrap();
    editor.update_set(0, 0, SetField::Reps, "5").unwrap();
    editor.commit("2024-01-01", &store, NOW_MS).unwrap();

    editor.add_exercise("Squat").unwrap();
    editor.update_set(0, 0, SetField::Weight, "105").unwrap();
    editor.update_set(0, 0, SetField::Reps, "5").unwrap();
    editor.commit("2024-01-03", &store, NOW_MS + 1).unwrap();

    assert_eq!(store.get_records().len(), 2);
}

fn filled_row_session() -> SessionEditor {
    let mut editor = SessionEditor::new();
    editor.add_exercise("Row").unwrap();
    editor.update_set(0, 0, SetField::Weight, "40").unwrap();
    editor.update_set(0, 0, SetField::Reps, "10").unwrap();
    editor
}

#[test]
fn test_commit_keeps_records_with_fractional_ids() {
    let raw = r#"[{"id":1704067200000.4321,"date":"2024-01-01","exercise":"Squat","sets":[{"weight":100,"reps":5}]}]"#;
    let store = RecordStore::new(
        MemoryStore::new().with_entry("myhealth_records", raw),
        StorageKeys::default(),
    );
    assert_eq!(store.get_records().len(), 1);

    let mut editor = filled_row_session();
    assert_eq!(editor.commit("2024-01-02", &store, NOW_MS), Ok(1));

    let exercises: Vec<String> = store.get_records().into_iter().map(|r| r.exercise).collect();
    assert_eq!(exercises, vec!["Squat".to_string(), "Row".to_string()]);
}

#[test]
fn test_commit_refuses_to_overwrite_unreadable_records() {
    let store = RecordStore::new(
        MemoryStore::new().with_entry("myhealth_records", r#"[{"id":1,"date":"someday"}]"#),
        StorageKeys::default(),
    );

    let mut editor = filled_row_session();
    let err = editor.commit("2024-01-02", &store, NOW_MS).unwrap_err();
    assert!(matches!(err, CommitError::Storage(StoreError::Corrupt { .. })));
    assert_eq!(
        store.backend().raw("myhealth_records").unwrap(),
        r#"[{"id":1,"date":"someday"}]"#
    );
    assert_eq!(editor.records().len(), 1);
}

proptest! {
    #[test]
    fn prop_session_never_holds_duplicate_names(
        names in proptest::collection::vec("[a-cA-C ]{1,3}", 0..20)
    ) {
        let mut editor = SessionEditor::new();
        for name in &names {
            let _ = editor.add_exercise(name);
        }
        let mut seen: Vec<String> = editor
            .records()
            .iter()
            .map(|r| r.exercise.trim().to_lowercase())
            .collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), total);
    }

    #[test]
    fn prop_invalid_set_never_reaches_storage(
        sets in proptest::collection::vec((-5.0f64..50.0, -5.0f64..20.0), 1..6),
        bad in 0usize..6,
    ) {
        let store = create_test_store();
        let mut editor = SessionEditor::new();
        editor.add_exercise("Squat").unwrap();
        for _ in 1..sets.len() {
            editor.add_set(0).unwrap();
        }
        for (i, (w, r)) in sets.iter().enumerate() {
            editor.update_set(0, i, SetField::Weight, &w.to_string()).unwrap();
            editor.update_set(0, i, SetField::Reps, &r.to_string()).unwrap();
        }
        let bad = bad % sets.len();
        editor.update_set(0, bad, SetField::Reps, "0").unwrap();

        let result = editor.commit("2024-01-01", &store, NOW_MS);
        let is_invalid_set = matches!(result, Err(CommitError::InvalidSet { .. }));
        prop_assert!(is_invalid_set);
        prop_assert!(store.get_records().is_empty());
        prop_assert_eq!(editor.records()[0].sets.len(), sets.len());
    }

    #[test]
    fn prop_commit_writes_one_record_per_exercise(
        exercises in 1usize..6,
        sets_each in 1usize..5,
    ) {
        let store = create_test_store();
        let mut editor = SessionEditor::new();
        for e in 0..exercises {
            editor.add_exercise(&format!("Exercise {}", e)).unwrap();
            for _ in 1..sets_each {
                editor.add_set(0).unwrap();
            }
            for s in 0..sets_each {
                editor.update_set(0, s, SetField::Weight, "20").unwrap();
                editor.update_set(0, s, SetField::Reps, "8").unwrap();
            }
        }

        prop_assert_eq!(editor.commit("2024-01-01", &store, NOW_MS), Ok(exercises));
        let records = store.get_records();
        prop_assert_eq!(records.len(), exercises);
        prop_assert!(records.iter().all(|r| r.sets.len() == sets_each));
        prop_assert!(editor.is_empty());
    }
}
