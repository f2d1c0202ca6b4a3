//! Per-view controllers. The router builds one from its factory on every
//! navigation and tears it down before the next.

mod record;
mod settings;
mod stats;

use std::rc::Rc;

use liftlog_core::{FragmentSource, RecordStore, Router, ViewHost};

use crate::browser::BrowserStorage;

pub use record::RecordController;
pub use settings::SettingsController;
pub use stats::StatsController;

pub type SharedStore = Rc<RecordStore<BrowserStorage>>;

/// Controller keys the route table may name.
pub const CONTROLLERS: &[&str] = &["record", "settings", "stats"];

pub fn register_all<F: FragmentSource, H: ViewHost>(router: &mut Router<F, H>, store: &SharedStore) {
    let s = store.clone();
    router.register("record", move || Box::new(RecordController::new(s.clone())));
    let s = store.clone();
    router.register("settings", move || Box::new(SettingsController::new(s.clone())));
    let s = store.clone();
    router.register("stats", move || Box::new(StatsController::new(s.clone())));
}
