//! Browser implementations of the core's platform traits.

use liftlog_core::router::token_from_hash;
use liftlog_core::{AppConfig, FetchError, FragmentSource, KeyValueStore, MemoryStore, Prompter, StoreError, ViewHost};
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, History, HtmlElement, Response, Storage};

pub const SIDEBAR_OPEN_CLASS: &str = "sidebar-open";
const CONFIG_ELEMENT_ID: &str = "app-config";

pub fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

fn body() -> Option<HtmlElement> {
    document().and_then(|d| d.body())
}

/// Read the optional JSON configuration embedded in `index.html`.
pub fn read_config() -> AppConfig {
    let text = document()
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    AppConfig::from_embedded(text.as_deref())
}

/// Today's date as `YYYY-MM-DD` (UTC).
pub fn today_iso() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    iso.chars().take(10).collect()
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn toggle_sidebar() {
    if let Some(body) = body() {
        if let Err(e) = body.class_list().toggle(SIDEBAR_OPEN_CLASS) {
            warn!("Failed to toggle sidebar: {}", describe(&e));
        }
    }
}

pub fn register_service_worker(path: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().service_worker().register(path);
    let path = path.to_string();
    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => info!("Registered asset cache worker {}", path),
            Err(e) => warn!("Asset cache worker {} not registered: {}", path, describe(&e)),
        }
    });
}

/// `localStorage`, or memory when the browser refuses access (for example
/// with storage disabled). Memory contents are lost on reload.
pub enum BrowserStorage {
    Local(Storage),
    Memory(MemoryStore),
}

impl BrowserStorage {
    pub fn open() -> Self {
        match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => BrowserStorage::Local(storage),
            Some(Err(e)) => {
                warn!("localStorage unavailable, keeping data in memory: {}", describe(&e));
                BrowserStorage::Memory(MemoryStore::new())
            }
            _ => {
                warn!("localStorage unavailable, keeping data in memory");
                BrowserStorage::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            BrowserStorage::Local(storage) => storage.get_item(key).map_err(|e| StoreError::Read {
                key: key.to_string(),
                reason: describe(&e),
            }),
            BrowserStorage::Memory(memory) => memory.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStorage::Local(storage) => storage.set_item(key, value).map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: describe(&e),
            }),
            BrowserStorage::Memory(memory) => memory.set_item(key, value),
        }
    }
}

/// `alert` / `confirm` dialogs.
#[derive(Clone, Copy, Default)]
pub struct BrowserPrompter;

impl Prompter for BrowserPrompter {
    fn notify(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(message) {
                warn!("Failed to show notice '{}': {}", message, describe(&e));
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}

/// Fragments fetched over HTTP relative to the page.
pub struct HttpFragments;

impl FragmentSource for HttpFragments {
    async fn fetch_fragment(&self, path: &str) -> Result<String, FetchError> {
        let transport = |reason: String| FetchError::Transport {
            path: path.to_string(),
            reason,
        };

        let window = web_sys::window().ok_or_else(|| transport("no window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|e| transport(describe(&e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| transport("unexpected fetch result".to_string()))?;

        if !response.ok() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        let body = response.text().map_err(|e| transport(describe(&e)))?;
        let text = JsFuture::from(body)
            .await
            .map_err(|e| transport(describe(&e)))?;
        text.as_string()
            .ok_or_else(|| transport("response body is not text".to_string()))
    }
}

/// The live document: content region, sidebar and address bar.
pub struct BrowserHost {
    content_region_id: String,
}

impl BrowserHost {
    pub fn new(content_region_id: &str) -> Self {
        Self {
            content_region_id: content_region_id.to_string(),
        }
    }
}

impl ViewHost for BrowserHost {
    fn set_content(&self, html: &str) {
        match document().and_then(|d| d.get_element_by_id(&self.content_region_id)) {
            Some(region) => region.set_inner_html(html),
            None => error!("Content region #{} not found", self.content_region_id),
        }
    }

    fn close_overlay(&self) {
        if let Some(body) = body() {
            if let Err(e) = body.class_list().remove_1(SIDEBAR_OPEN_CLASS) {
                warn!("Failed to close sidebar: {}", describe(&e));
            }
        }
    }

    fn current_token(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .map(|hash| token_from_hash(&hash).to_string())
            .unwrap_or_default()
    }

    fn push_token(&self, token: &str) {
        update_address(token, |history, url| {
            history.push_state_with_url(&JsValue::NULL, "", Some(url))
        });
    }

    fn replace_token(&self, token: &str) {
        update_address(token, |history, url| {
            history.replace_state_with_url(&JsValue::NULL, "", Some(url))
        });
    }
}

fn update_address<F>(token: &str, apply: F)
where
    F: FnOnce(&History, &str) -> Result<(), JsValue>,
{
    let Some(window) = web_sys::window() else {
        return;
    };
    let url = format!("#/{}", token);
    match window.history() {
        Ok(history) => {
            if let Err(e) = apply(&history, &url) {
                warn!("Failed to update address to {}: {}", url, describe(&e));
            }
        }
        Err(e) => warn!("History unavailable: {}", describe(&e)),
    }
}
