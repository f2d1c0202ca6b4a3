//! Small helpers over web-sys for view controllers.

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlElement, HtmlInputElement, Node};

use crate::browser::{describe, document};

/// An event listener that is removed when dropped.
pub struct EventBinding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventBinding {
    pub fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, String>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| format!("Failed to listen for {}: {}", event, describe(&e)))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Element by id, or an error naming the missing id.
pub fn require<T: JsCast>(id: &str) -> Result<T, String> {
    document()
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| format!("Missing element #{}", id))
}

pub fn find<T: JsCast>(id: &str) -> Option<T> {
    require(id).ok()
}

/// Elements under `root` matching `selector`.
pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Element that received `event`, if it is an element.
pub fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub fn index_attr(el: &Element, attr: &str) -> Option<usize> {
    el.get_attribute(attr).and_then(|v| v.parse().ok())
}

pub fn input_value(event: &Event) -> Option<(HtmlInputElement, String)> {
    let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
    let value = input.value();
    Some((input, value))
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let display = if visible { "block" } else { "none" };
    if let Err(e) = el.style().set_property("display", display) {
        warn!("Failed to set display on #{}: {}", el.id(), describe(&e));
    }
}

/// Run `f` from a zero-delay timer, once the current event and any default
/// action it triggers (such as moving focus) have finished.
pub fn defer<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0) {
        warn!("Failed to schedule callback: {}", describe(&e));
    }
}

/// The focused element, when it sits inside `root`.
pub fn focused_within(root: &Element) -> Option<Element> {
    let active = document()?.active_element()?;
    let node: &Node = &active;
    root.contains(Some(node)).then_some(active)
}
