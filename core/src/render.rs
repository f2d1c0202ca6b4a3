//! Markup projections of application state.
//!
//! Every function here is pure: the same input always gives the same markup.
//! Views replace a region's contents with the result and then rebind their
//! listeners, since the previous nodes are gone.

use std::fmt::Write;

use crate::error::FetchError;
use crate::session::{SessionEditor, SetField};
use crate::stats::{ExerciseBest, Summary};
use crate::store::WorkoutRecord;

/// Element ids, classes and data attributes shared by markup and listeners.
pub mod dom {
    pub const RECORDS_CONTAINER: &str = "exercise-records-container";
    pub const COMMIT_BUTTON: &str = "save-all-records-btn";
    pub const DATE_INPUT: &str = "record-date";
    pub const PICKER_MODAL: &str = "exercise-select-modal";
    pub const PICKER_LIST: &str = "modal-exercise-list";
    pub const PICKER_OPEN: &str = "open-exercise-modal-btn";
    pub const PICKER_CLOSE: &str = "close-btn";

    pub const CATALOG_LIST: &str = "exercise-list";
    pub const CATALOG_INPUT: &str = "new-exercise-input";
    pub const CATALOG_ADD: &str = "add-exercise-btn";

    pub const STATS_SUMMARY: &str = "stats-summary";
    pub const STATS_BESTS: &str = "stats-bests";
    pub const STATS_RECENT: &str = "stats-recent";
    pub const STATS_ALL: &str = "all-records-list";

    pub const SET_INPUT: &str = "set-input";
    pub const ADD_SET: &str = "btn-add-set";
    pub const DELETE_SET: &str = "btn-delete-set";
    pub const DELETE_EXERCISE: &str = "btn-delete-exercise";
    pub const PICKER_ITEM: &str = "modal-list-item";
    pub const CATALOG_DELETE: &str = "btn-delete";
    pub const RECORD_DELETE: &str = "btn-delete-record";

    pub const ATTR_RECORD: &str = "data-record-index";
    pub const ATTR_SET: &str = "data-set-index";
    pub const ATTR_FIELD: &str = "data-field";
    pub const ATTR_EXERCISE: &str = "data-exercise";
    pub const ATTR_NAME: &str = "data-name";
    pub const ATTR_ID: &str = "data-id";
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shortest decimal form: `50` rather than `50.0`.
pub fn format_amount(value: f64) -> String {
    format!("{}", value)
}

impl SetField {
    pub fn attr_value(self) -> &'static str {
        match self {
            SetField::Weight => "weight",
            SetField::Reps => "reps",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "weight" => Some(SetField::Weight),
            "reps" => Some(SetField::Reps),
            _ => None,
        }
    }
}

/// Painted session: card markup plus whether the commit control is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMarkup {
    pub html: String,
    pub show_commit: bool,
}

pub fn render_session(editor: &SessionEditor) -> SessionMarkup {
    let records = editor.records();
    if records.is_empty() {
        return SessionMarkup {
            html: r#"<p class="placeholder-text">No exercises in this session yet.</p>"#.to_string(),
            show_commit: false,
        };
    }

    let mut html = String::new();
    for (index, record) in records.iter().enumerate() {
        let mut rows = String::new();
        if record.sets.is_empty() {
            rows.push_str(r#"<tr><td colspan="4" class="empty-row">Add a set.</td></tr>"#);
        }
        for (set_index, set) in record.sets.iter().enumerate() {
            let _ = write!(
                rows,
                r#"<tr><td>{n}</td><td>{weight}</td><td>{reps}</td><td><button class="{del}" {ra}="{index}" {sa}="{set_index}">&#10005;</button></td></tr>"#,
                n = set_index + 1,
                weight = set_input(index, set_index, SetField::Weight, set.weight),
                reps = set_input(index, set_index, SetField::Reps, set.reps),
                del = dom::DELETE_SET,
                ra = dom::ATTR_RECORD,
                sa = dom::ATTR_SET,
            );
        }

        let _ = write!(
            html,
            r#"<div class="card exercise-record-card" {ra}="{index}"><div class="card-header"><h4>{name}</h4><button class="{del}" {ra}="{index}">Remove exercise</button></div><table class="set-record-table"><thead><tr><th>Set</th><th>Weight (kg)</th><th>Reps</th><th></th></tr></thead><tbody>{rows}</tbody></table><button class="{add}" {ra}="{index}">Add set</button></div>"#,
            ra = dom::ATTR_RECORD,
            name = escape_html(&record.exercise),
            del = dom::DELETE_EXERCISE,
            add = dom::ADD_SET,
        );
    }

    SessionMarkup {
        html,
        show_commit: true,
    }
}

fn set_input(record: usize, set: usize, field: SetField, value: f64) -> String {
    let placeholder = match field {
        SetField::Weight => "kg",
        SetField::Reps => "reps",
    };
    format!(
        r#"<input type="number" class="{class}" {ra}="{record}" {sa}="{set}" {fa}="{field}" value="{value}" min="0" placeholder="{placeholder}">"#,
        class = dom::SET_INPUT,
        ra = dom::ATTR_RECORD,
        sa = dom::ATTR_SET,
        fa = dom::ATTR_FIELD,
        field = field.attr_value(),
        value = format_amount(value),
    )
}

/// CSS selector for the input painted for one set field. Views use it to
/// give focus back to the same field after a repaint.
pub fn set_input_selector(record: usize, set: usize, field: SetField) -> String {
    format!(
        r#".{class}[{ra}="{record}"][{sa}="{set}"][{fa}="{field}"]"#,
        class = dom::SET_INPUT,
        ra = dom::ATTR_RECORD,
        sa = dom::ATTR_SET,
        fa = dom::ATTR_FIELD,
        field = field.attr_value(),
    )
}

/// Catalog entries offered by the exercise picker.
pub fn render_picker(exercises: &[String]) -> String {
    if exercises.is_empty() {
        return r#"<li class="placeholder-text">No exercises yet. Add some in Settings.</li>"#
            .to_string();
    }
    exercises
        .iter()
        .map(|e| {
            let name = escape_html(e);
            format!(
                r#"<li class="{class}" {attr}="{name}">{name}</li>"#,
                class = dom::PICKER_ITEM,
                attr = dom::ATTR_EXERCISE,
            )
        })
        .collect()
}

/// The catalog as edited on the settings view.
pub fn render_catalog(exercises: &[String]) -> String {
    if exercises.is_empty() {
        return r#"<p class="placeholder-text">No exercises registered.</p>"#.to_string();
    }
    exercises
        .iter()
        .map(|e| {
            let name = escape_html(e);
            format!(
                r#"<li class="exercise-item"><span>{name}</span><button class="{class}" {attr}="{name}">Delete</button></li>"#,
                class = dom::CATALOG_DELETE,
                attr = dom::ATTR_NAME,
            )
        })
        .collect()
}

/// Panel shown in the content region when a view fragment fails to load.
pub fn render_error_panel(err: &FetchError) -> String {
    format!(
        r#"<div class="card error-panel"><h2>Something went wrong</h2><p>This screen could not be loaded.</p><p class="error-detail">{}</p></div>"#,
        escape_html(&err.to_string())
    )
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        r#"<ul class="summary-list"><li><strong>{}</strong> exercises logged</li><li><strong>{}</strong> training days</li><li><strong>{}</strong> sets</li></ul>"#,
        summary.records, summary.days, summary.sets
    )
}

pub fn render_bests(bests: &[ExerciseBest]) -> String {
    if bests.is_empty() {
        return r#"<p class="placeholder-text">No records yet.</p>"#.to_string();
    }
    let rows: String = bests
        .iter()
        .map(|b| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&b.exercise),
                format_amount(b.volume),
                format_amount(b.best_set.weight),
                format_amount(b.best_set.reps),
            )
        })
        .collect();
    format!(
        r#"<table class="stats-table"><thead><tr><th>Exercise</th><th>Best volume</th><th>Weight</th><th>Reps</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

fn describe_sets(record: &WorkoutRecord) -> String {
    record
        .sets
        .iter()
        .map(|s| format!("{}kg&times;{}", format_amount(s.weight), format_amount(s.reps)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_recent(records: &[&WorkoutRecord]) -> String {
    if records.is_empty() {
        return r#"<p class="placeholder-text">No records yet.</p>"#.to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                r#"<li class="recent-item"><span class="record-date">{}</span> <strong>{}</strong> <span class="record-sets">{}</span></li>"#,
                r.date,
                escape_html(&r.exercise),
                describe_sets(r)
            )
        })
        .collect()
}

/// Every stored record with a delete control.
pub fn render_record_list(records: &[WorkoutRecord]) -> String {
    if records.is_empty() {
        return r#"<p class="placeholder-text">No records yet.</p>"#.to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                r#"<li class="record-item"><span class="record-date">{date}</span> <strong>{name}</strong> <span class="record-sets">{sets}</span><button class="{class}" {attr}="{id}">Delete</button></li>"#,
                date = r.date,
                name = escape_html(&r.exercise),
                sets = describe_sets(r),
                class = dom::RECORD_DELETE,
                attr = dom::ATTR_ID,
                id = r.id,
            )
        })
        .collect()
}
