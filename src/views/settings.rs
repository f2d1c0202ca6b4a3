//! Settings view: maintain the exercise catalog.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use liftlog_core::catalog::{add_to_catalog, remove_from_catalog};
use liftlog_core::render::{dom, render_catalog};
use liftlog_core::{Prompter, ViewController};
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, KeyboardEvent};

use super::SharedStore;
use crate::browser::BrowserPrompter;
use crate::dom::{event_element, has_class, require, EventBinding};

pub struct SettingsController {
    store: SharedStore,
    view: Option<Rc<SettingsView>>,
}

impl SettingsController {
    pub fn new(store: SharedStore) -> Self {
        Self { store, view: None }
    }
}

impl ViewController for SettingsController {
    fn mount(&mut self) -> Result<(), String> {
        let view = Rc::new(SettingsView {
            store: self.store.clone(),
            prompter: BrowserPrompter,
            list: require(dom::CATALOG_LIST)?,
            input: require(dom::CATALOG_INPUT)?,
            add_button: require(dom::CATALOG_ADD)?,
            bindings: RefCell::new(Vec::new()),
        });
        SettingsView::bind(&view)?;
        view.repaint();
        self.view = Some(view);
        info!("Settings view ready");
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(view) = self.view.take() {
            view.bindings.borrow_mut().clear();
        }
    }
}

struct SettingsView {
    store: SharedStore,
    prompter: BrowserPrompter,
    list: Element,
    input: HtmlInputElement,
    add_button: Element,
    bindings: RefCell<Vec<EventBinding>>,
}

impl SettingsView {
    fn bind(this: &Rc<Self>) -> Result<(), String> {
        let weak: Weak<Self> = Rc::downgrade(this);
        let on_add = {
            let weak = weak.clone();
            move |_: Event| {
                if let Some(view) = weak.upgrade() {
                    view.submit();
                }
            }
        };
        let on_key = {
            let weak = weak.clone();
            move |ev: Event| {
                let enter = ev
                    .dyn_ref::<KeyboardEvent>()
                    .map(|k| k.key() == "Enter")
                    .unwrap_or(false);
                if let (true, Some(view)) = (enter, weak.upgrade()) {
                    view.submit();
                }
            }
        };
        let on_list = move |ev: Event| {
            if let Some(view) = weak.upgrade() {
                view.on_list_click(&ev);
            }
        };

        *this.bindings.borrow_mut() = vec![
            EventBinding::listen(&this.add_button, "click", on_add)?,
            EventBinding::listen(&this.input, "keydown", on_key)?,
            EventBinding::listen(&this.list, "click", on_list)?,
        ];
        Ok(())
    }

    fn repaint(&self) {
        self.list
            .set_inner_html(&render_catalog(&self.store.get_exercises()));
    }

    fn submit(&self) {
        match add_to_catalog(&*self.store, &self.input.value()) {
            Ok(_) => {
                self.input.set_value("");
                self.repaint();
            }
            Err(e) => {
                warn!("Catalog add refused: {}", e);
                self.prompter.notify(&e.to_string());
            }
        }
    }

    fn on_list_click(&self, event: &Event) {
        let Some(target) = event_element(event) else {
            return;
        };
        if !has_class(&target, dom::CATALOG_DELETE) {
            return;
        }
        let Some(name) = target.get_attribute(dom::ATTR_NAME) else {
            return;
        };
        if !self
            .prompter
            .confirm(&format!("Delete \"{}\" from your exercises?", name))
        {
            return;
        }

        match remove_from_catalog(&*self.store, &name) {
            Ok(_) => self.repaint(),
            Err(e) => self.prompter.notify(&e.to_string()),
        }
    }
}
