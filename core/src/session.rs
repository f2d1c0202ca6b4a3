//! In-progress workout for one visit to the logging view.
//!
//! Every edit here is in memory only. Storage is touched by [`SessionEditor::commit`]
//! alone, after the whole session has been validated.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::catalog::same_exercise;
use crate::error::{CommitError, SessionError};
use crate::prompt::Prompter;
use crate::store::{KeyValueStore, RecordId, RecordStore, SetEntry, WorkoutRecord};

/// Which half of a set an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
}

/// One exercise and its sets, not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub exercise: String,
    pub sets: Vec<SetEntry>,
}

#[derive(Debug, Default)]
pub struct SessionEditor {
    records: Vec<SessionRecord>,
}

/// Parse a numeric input. Empty or unreadable input counts as zero so the
/// commit check rejects it later.
fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            debug!("Unreadable set value '{}', using 0", raw);
            0.0
        }
    }
}

impl SessionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records, newest first.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record_mut(&mut self, record: usize) -> Result<&mut SessionRecord, SessionError> {
        self.records
            .get_mut(record)
            .ok_or(SessionError::NoSuchRecord(record))
    }

    fn set_mut(&mut self, record: usize, set: usize) -> Result<&mut SetEntry, SessionError> {
        self.record_mut(record)?
            .sets
            .get_mut(set)
            .ok_or(SessionError::NoSuchSet { record, set })
    }

    /// Put `name` at the front of the session with one empty set.
    pub fn add_exercise(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if let Some(existing) = self.records.iter().find(|r| same_exercise(&r.exercise, name)) {
            return Err(SessionError::DuplicateExercise(existing.exercise.clone()));
        }

        self.records.insert(
            0,
            SessionRecord {
                exercise: name.to_string(),
                sets: vec![SetEntry::default()],
            },
        );
        debug!("Added {} to session", name);
        Ok(())
    }

    pub fn add_set(&mut self, record: usize) -> Result<(), SessionError> {
        self.record_mut(record)?.sets.push(SetEntry::default());
        Ok(())
    }

    /// Write a raw input value into one field of a set. Returns the parsed
    /// value. Bounds are checked only at commit.
    pub fn update_set(
        &mut self,
        record: usize,
        set: usize,
        field: SetField,
        raw: &str,
    ) -> Result<f64, SessionError> {
        let value = parse_amount(raw);
        let entry = self.set_mut(record, set)?;
        match field {
            SetField::Weight => entry.weight = value,
            SetField::Reps => entry.reps = value,
        }
        Ok(value)
    }

    /// Remove one set after the user confirms. Returns whether it was removed.
    pub fn remove_set(
        &mut self,
        record: usize,
        set: usize,
        prompter: &dyn Prompter,
    ) -> Result<bool, SessionError> {
        self.set_mut(record, set)?;
        if !prompter.confirm("Delete this set?") {
            return Ok(false);
        }
        self.record_mut(record)?.sets.remove(set);
        Ok(true)
    }

    /// Remove a whole exercise after the user confirms.
    pub fn remove_exercise(
        &mut self,
        record: usize,
        prompter: &dyn Prompter,
    ) -> Result<bool, SessionError> {
        let exercise = self.record_mut(record)?.exercise.clone();
        if !prompter.confirm(&format!("Delete all sets of {}?", exercise)) {
            return Ok(false);
        }
        self.records.remove(record);
        debug!("Removed {} from session", exercise);
        Ok(true)
    }

    /// Check the session against a date without writing anything. Returns
    /// the parsed date and the records that would be committed.
    pub fn validate(&self, date: &str) -> Result<(NaiveDate, Vec<&SessionRecord>), CommitError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(CommitError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| CommitError::InvalidDate(date.to_string()))?;

        for record in &self.records {
            if let Some(pos) = record.sets.iter().position(|s| !s.is_valid()) {
                return Err(CommitError::InvalidSet {
                    exercise: record.exercise.clone(),
                    set: pos + 1,
                });
            }
        }

        let selected: Vec<&SessionRecord> =
            self.records.iter().filter(|r| !r.sets.is_empty()).collect();
        if selected.is_empty() {
            return Err(CommitError::EmptySelection);
        }
        Ok((date, selected))
    }

    /// Validate, then append one workout record per exercise and clear the
    /// session. Returns the number of exercises committed. On any error the
    /// session and the store are left as they were.
    pub fn commit<S: KeyValueStore>(
        &mut self,
        date: &str,
        store: &RecordStore<S>,
        now_ms: u64,
    ) -> Result<usize, CommitError> {
        let (date, selected) = self.validate(date)?;

        let mut taken: HashSet<RecordId> = store.get_records().iter().map(|r| r.id).collect();
        let records: Vec<WorkoutRecord> = selected
            .into_iter()
            .map(|r| {
                let mut id = RecordId::generate(now_ms);
                while !taken.insert(id) {
                    id = RecordId::generate(now_ms);
                }
                WorkoutRecord {
                    id,
                    date,
                    exercise: r.exercise.clone(),
                    sets: r.sets.clone(),
                }
            })
            .collect();

        store.append_records(&records)?;
        self.records.clear();
        info!("Committed {} exercises for {}", records.len(), date);
        Ok(records.len())
    }

    /// Drop everything uncommitted. Returns how many exercises were lost.
    pub fn discard(&mut self) -> usize {
        let lost = self.records.len();
        self.records.clear();
        lost
    }
}
