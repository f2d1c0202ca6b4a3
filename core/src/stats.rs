//! Aggregates over stored workout records for the statistics view.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::store::{SetEntry, WorkoutRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub records: usize,
    pub days: usize,
    pub sets: usize,
}

/// Highest-volume session of one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseBest {
    pub exercise: String,
    pub volume: f64,
    pub date: NaiveDate,
    /// Heaviest set of that session.
    pub best_set: SetEntry,
}

pub fn summarize(records: &[WorkoutRecord]) -> Summary {
    let days: HashSet<NaiveDate> = records.iter().map(|r| r.date).collect();
    Summary {
        records: records.len(),
        days: days.len(),
        sets: records.iter().map(|r| r.sets.len()).sum(),
    }
}

/// Best session volume per exercise, ordered by exercise name. Names are
/// grouped case-insensitively; the first spelling seen is kept.
pub fn best_volumes(records: &[WorkoutRecord]) -> Vec<ExerciseBest> {
    let mut bests: BTreeMap<String, ExerciseBest> = BTreeMap::new();
    for record in records {
        let volume = record.volume();
        let Some(best_set) = record
            .sets
            .iter()
            .copied()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
        else {
            continue;
        };

        let key = record.exercise.trim().to_lowercase();
        match bests.get_mut(&key) {
            Some(current) if current.volume >= volume => {}
            Some(current) => {
                current.volume = volume;
                current.date = record.date;
                current.best_set = best_set;
            }
            None => {
                bests.insert(
                    key,
                    ExerciseBest {
                        exercise: record.exercise.clone(),
                        volume,
                        date: record.date,
                        best_set,
                    },
                );
            }
        }
    }
    bests.into_values().collect()
}

/// The `limit` most recent records, newest date first.
pub fn recent(records: &[WorkoutRecord], limit: usize) -> Vec<&WorkoutRecord> {
    let mut sorted: Vec<&WorkoutRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    sorted.truncate(limit);
    sorted
}
