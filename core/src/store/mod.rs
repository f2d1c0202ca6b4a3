mod backend;
mod records;
mod types;

pub use backend::{KeyValueStore, MemoryStore};
pub use records::{LoadOutcome, RecordStore};
pub use types::{RecordId, SetEntry, WorkoutRecord};
