pub mod catalog;
pub mod config;
pub mod error;
pub mod prompt;
pub mod render;
pub mod router;
pub mod session;
pub mod stats;
pub mod store;

pub use config::{AppConfig, RouteConfig, StorageKeys};
pub use error::{CatalogError, CommitError, ConfigError, FetchError, SessionError, StoreError};
pub use prompt::Prompter;
pub use router::{FragmentSource, NavigationOutcome, RouteTable, Router, ViewController, ViewHost};
pub use session::{SessionEditor, SessionRecord, SetField};
pub use store::{KeyValueStore, LoadOutcome, MemoryStore, RecordId, RecordStore, SetEntry, WorkoutRecord};
