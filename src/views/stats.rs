//! Statistics view over committed records, with record deletion.

use std::rc::Rc;

use liftlog_core::render::{dom, render_bests, render_recent, render_record_list, render_summary};
use liftlog_core::stats::{best_volumes, recent, summarize};
use liftlog_core::{Prompter, RecordId, ViewController};
use tracing::{info, warn};
use web_sys::{Element, Event};

use super::SharedStore;
use crate::browser::BrowserPrompter;
use crate::dom::{event_element, find, has_class, require, EventBinding};

const RECENT_LIMIT: usize = 5;

pub struct StatsController {
    store: SharedStore,
    view: Option<Rc<StatsView>>,
    binding: Option<EventBinding>,
}

impl StatsController {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            view: None,
            binding: None,
        }
    }
}

impl ViewController for StatsController {
    fn mount(&mut self) -> Result<(), String> {
        let view = Rc::new(StatsView {
            store: self.store.clone(),
            prompter: BrowserPrompter,
            summary: find(dom::STATS_SUMMARY),
            bests: find(dom::STATS_BESTS),
            recent: find(dom::STATS_RECENT),
            all: require(dom::STATS_ALL)?,
        });
        view.repaint();

        let weak = Rc::downgrade(&view);
        self.binding = Some(EventBinding::listen(&view.all, "click", move |ev| {
            if let Some(view) = weak.upgrade() {
                view.on_delete_click(&ev);
            }
        })?);
        self.view = Some(view);
        info!("Stats view ready");
        Ok(())
    }

    fn teardown(&mut self) {
        self.binding = None;
        self.view = None;
    }
}

struct StatsView {
    store: SharedStore,
    prompter: BrowserPrompter,
    summary: Option<Element>,
    bests: Option<Element>,
    recent: Option<Element>,
    all: Element,
}

impl StatsView {
    fn repaint(&self) {
        let records = self.store.get_records();
        if let Some(el) = &self.summary {
            el.set_inner_html(&render_summary(&summarize(&records)));
        }
        if let Some(el) = &self.bests {
            el.set_inner_html(&render_bests(&best_volumes(&records)));
        }
        if let Some(el) = &self.recent {
            el.set_inner_html(&render_recent(&recent(&records, RECENT_LIMIT)));
        }
        self.all.set_inner_html(&render_record_list(&records));
    }

    fn on_delete_click(&self, event: &Event) {
        let Some(target) = event_element(event) else {
            return;
        };
        if !has_class(&target, dom::RECORD_DELETE) {
            return;
        }
        let Some(id) = target
            .get_attribute(dom::ATTR_ID)
            .and_then(|raw| RecordId::parse(&raw))
        else {
            warn!("Delete control without a record id");
            return;
        };
        if !self.prompter.confirm("Delete this record permanently?") {
            return;
        }

        match self.store.delete_record(id) {
            Ok(true) => {
                self.repaint();
                self.prompter.notify("Record deleted.");
            }
            Ok(false) => self.prompter.notify("That record could not be found."),
            Err(e) => self.prompter.notify(&e.to_string()),
        }
    }
}
