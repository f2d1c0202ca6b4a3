use thiserror::Error;

/// A view fragment could not be retrieved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Failed to load view {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Failed to load view {path}: {reason}")]
    Transport { path: String, reason: String },
}

/// Durable storage could not be read or written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Storage read failed for {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Storage write failed for {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Failed to serialize {key}: {reason}")]
    Serialize { key: String, reason: String },

    #[error("Stored data under {key} is unreadable, leaving it untouched: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Rejected edits to the in-progress session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Exercise name is empty")]
    EmptyName,

    #[error("{0} is already in this session")]
    DuplicateExercise(String),

    #[error("No exercise at position {0}")]
    NoSuchRecord(usize),

    #[error("No set {set} for exercise at position {record}")]
    NoSuchSet { record: usize, set: usize },
}

/// Reasons a session commit was refused. Nothing is written when any of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitError {
    #[error("Please choose a date")]
    MissingDate,

    #[error("Not a valid date: {0}")]
    InvalidDate(String),

    #[error("Every set needs a weight and reps above 0 ({exercise}, set {set})")]
    InvalidSet { exercise: String, set: usize },

    #[error("There are no exercises to save")]
    EmptySelection,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Rejected changes to the exercise catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Please enter an exercise name")]
    EmptyName,

    #[error("{0} already exists")]
    Duplicate(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Default view '{0}' has no route")]
    UnroutedDefault(String),

    #[error("Route '{token}' names unknown controller '{controller}'")]
    UnknownController { token: String, controller: String },
}

impl From<FetchError> for String {
    fn from(err: FetchError) -> Self {
        err.to_string()
    }
}

impl From<StoreError> for String {
    fn from(err: StoreError) -> Self {
        err.to_string()
    }
}

impl From<SessionError> for String {
    fn from(err: SessionError) -> Self {
        err.to_string()
    }
}

impl From<CommitError> for String {
    fn from(err: CommitError) -> Self {
        err.to_string()
    }
}

impl From<CatalogError> for String {
    fn from(err: CatalogError) -> Self {
        err.to_string()
    }
}
