//! Logging view: the in-progress session, the exercise picker and commit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use liftlog_core::render::{dom, render_picker, render_session, set_input_selector};
use liftlog_core::{Prompter, SessionEditor, SetField, ViewController};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlElement, HtmlInputElement};

use super::SharedStore;
use crate::browser::{describe, now_ms, today_iso, BrowserPrompter};
use crate::dom::{
    defer, event_element, find, focused_within, has_class, index_attr, input_value, query_all, require, set_visible,
    EventBinding,
};

pub struct RecordController {
    store: SharedStore,
    view: Option<Rc<RecordView>>,
}

impl RecordController {
    pub fn new(store: SharedStore) -> Self {
        Self { store, view: None }
    }
}

impl ViewController for RecordController {
    fn mount(&mut self) -> Result<(), String> {
        let view = Rc::new(RecordView::locate(self.store.clone())?);
        view.reset_date();
        RecordView::bind(&view)?;
        view.repaint();
        self.view = Some(view);
        info!("Record view ready");
        Ok(())
    }

    fn teardown(&mut self) {
        let Some(view) = self.view.take() else {
            return;
        };
        let lost = view.editor.borrow_mut().discard();
        if lost > 0 {
            info!("Leaving record view, {} uncommitted exercises discarded", lost);
        }
        view.bindings.borrow_mut().clear();
        view.paint_bindings.borrow_mut().clear();
    }
}

struct RecordView {
    store: SharedStore,
    prompter: BrowserPrompter,
    editor: RefCell<SessionEditor>,
    container: Element,
    commit_button: HtmlElement,
    date_input: HtmlInputElement,
    modal: Option<HtmlElement>,
    picker_list: Option<Element>,
    /// Listeners on elements that live as long as the view.
    bindings: RefCell<Vec<EventBinding>>,
    /// Listeners on painted nodes, replaced on every repaint.
    paint_bindings: RefCell<Vec<EventBinding>>,
}

impl RecordView {
    fn locate(store: SharedStore) -> Result<Self, String> {
        Ok(Self {
            store,
            prompter: BrowserPrompter,
            editor: RefCell::new(SessionEditor::new()),
            container: require(dom::RECORDS_CONTAINER)?,
            commit_button: require(dom::COMMIT_BUTTON)?,
            date_input: require(dom::DATE_INPUT)?,
            modal: find(dom::PICKER_MODAL),
            picker_list: find(dom::PICKER_LIST),
            bindings: RefCell::new(Vec::new()),
            paint_bindings: RefCell::new(Vec::new()),
        })
    }

    fn reset_date(&self) {
        self.date_input.set_value(&today_iso());
    }

    /// Listen on `target`, forwarding to `handler` while the view is alive.
    fn listen(
        this: &Rc<Self>,
        target: &EventTarget,
        event: &'static str,
        handler: fn(&Rc<Self>, Event),
    ) -> Result<EventBinding, String> {
        let weak: Weak<Self> = Rc::downgrade(this);
        EventBinding::listen(target, event, move |ev| {
            if let Some(view) = weak.upgrade() {
                handler(&view, ev);
            }
        })
    }

    fn bind(this: &Rc<Self>) -> Result<(), String> {
        let mut bindings = vec![
            Self::listen(this, &this.container, "click", Self::on_card_click)?,
            Self::listen(this, &this.commit_button, "click", |view, _| view.commit())?,
        ];
        if let Some(open) = find::<Element>(dom::PICKER_OPEN) {
            bindings.push(Self::listen(this, &open, "click", |view, _| view.open_picker())?);
        }
        if let Some(modal) = &this.modal {
            bindings.push(Self::listen(this, modal, "click", Self::on_modal_click)?);
        }
        if let Some(list) = &this.picker_list {
            bindings.push(Self::listen(this, list, "click", Self::on_picker_click)?);
        }
        *this.bindings.borrow_mut() = bindings;
        Ok(())
    }

    /// Paint the whole session from state and rebind the set inputs. A set
    /// field that had focus keeps it.
    fn repaint(self: &Rc<Self>) {
        let focused = focused_within(&self.container).and_then(|el| set_input_key(&el));
        let markup = render_session(&self.editor.borrow());
        self.paint_bindings.borrow_mut().clear();
        self.container.set_inner_html(&markup.html);
        set_visible(&self.commit_button, markup.show_commit);
        if let Some((record, set, field)) = focused {
            self.focus_set_input(record, set, field);
        }

        let selector = format!(".{}", dom::SET_INPUT);
        let mut bindings = Vec::new();
        for input in query_all(&self.container, &selector) {
            match Self::listen(self, &input, "change", Self::on_set_change) {
                Ok(binding) => bindings.push(binding),
                Err(e) => warn!("{}", e),
            }
        }
        *self.paint_bindings.borrow_mut() = bindings;
    }

    fn focus_set_input(&self, record: usize, set: usize, field: SetField) {
        let selector = set_input_selector(record, set, field);
        let input = self
            .container
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(input) = input {
            if let Err(e) = input.focus() {
                debug!("Could not refocus {}: {}", selector, describe(&e));
            }
        }
    }

    fn on_set_change(this: &Rc<Self>, event: Event) {
        let Some((input, value)) = input_value(&event) else {
            return;
        };
        let record = index_attr(&input, dom::ATTR_RECORD);
        let set = index_attr(&input, dom::ATTR_SET);
        let field = input
            .get_attribute(dom::ATTR_FIELD)
            .and_then(|f| SetField::from_attr(&f));
        let (Some(record), Some(set), Some(field)) = (record, set, field) else {
            return;
        };

        let result = this.editor.borrow_mut().update_set(record, set, field, &value);
        match result {
            // `change` fires before Tab moves focus; repaint once it has
            // landed so the next field is the one refocused.
            Ok(_) => {
                let weak = Rc::downgrade(this);
                defer(move || {
                    if let Some(view) = weak.upgrade() {
                        view.repaint();
                    }
                });
            }
            Err(e) => warn!("Ignoring set edit: {}", e),
        }
    }

    fn on_card_click(this: &Rc<Self>, event: Event) {
        let Some(target) = event_element(&event) else {
            return;
        };
        let Some(record) = index_attr(&target, dom::ATTR_RECORD) else {
            return;
        };
        let set = index_attr(&target, dom::ATTR_SET);

        let result = if has_class(&target, dom::ADD_SET) {
            this.editor.borrow_mut().add_set(record).map(|_| true)
        } else if has_class(&target, dom::DELETE_SET) {
            match set {
                Some(set) => this
                    .editor
                    .borrow_mut()
                    .remove_set(record, set, &this.prompter),
                None => Ok(false),
            }
        } else if has_class(&target, dom::DELETE_EXERCISE) {
            this.editor
                .borrow_mut()
                .remove_exercise(record, &this.prompter)
        } else {
            Ok(false)
        };

        match result {
            Ok(true) => this.repaint(),
            Ok(false) => {}
            Err(e) => warn!("Ignoring session edit: {}", e),
        }
    }

    fn open_picker(&self) {
        if let Some(list) = &self.picker_list {
            list.set_inner_html(&render_picker(&self.store.get_exercises()));
        }
        if let Some(modal) = &self.modal {
            set_visible(modal, true);
        }
    }

    fn close_picker(&self) {
        if let Some(modal) = &self.modal {
            set_visible(modal, false);
        }
    }

    fn on_modal_click(this: &Rc<Self>, event: Event) {
        let Some(target) = event_element(&event) else {
            return;
        };
        let backdrop = this
            .modal
            .as_ref()
            .map(|m| **m == target)
            .unwrap_or(false);
        if backdrop || has_class(&target, dom::PICKER_CLOSE) {
            this.close_picker();
        }
    }

    fn on_picker_click(this: &Rc<Self>, event: Event) {
        let Some(target) = event_element(&event) else {
            return;
        };
        if !has_class(&target, dom::PICKER_ITEM) {
            return;
        }
        let Some(name) = target.get_attribute(dom::ATTR_EXERCISE) else {
            return;
        };

        let result = this.editor.borrow_mut().add_exercise(&name);
        this.close_picker();
        match result {
            Ok(()) => this.repaint(),
            Err(e) => this.prompter.notify(&e.to_string()),
        }
    }

    fn commit(self: &Rc<Self>) {
        let date = self.date_input.value();
        let result = self
            .editor
            .borrow_mut()
            .commit(&date, &*self.store, now_ms());
        match result {
            Ok(count) => {
                self.repaint();
                self.reset_date();
                self.prompter
                    .notify(&format!("Saved {} exercise(s).", count));
            }
            Err(e) => {
                warn!("Commit refused: {}", e);
                self.prompter.notify(&e.to_string());
            }
        }
    }
}

fn set_input_key(el: &Element) -> Option<(usize, usize, SetField)> {
    if !has_class(el, dom::SET_INPUT) {
        return None;
    }
    let field = el.get_attribute(dom::ATTR_FIELD).and_then(|f| SetField::from_attr(&f))?;
    Some((index_attr(el, dom::ATTR_RECORD)?, index_attr(el, dom::ATTR_SET)?, field))
}
