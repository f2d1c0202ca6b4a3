use std::rc::Rc;

use leptos::prelude::*;
use liftlog_core::{AppConfig, RecordStore, RouteTable, Router};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::browser::{describe, toggle_sidebar, BrowserHost, BrowserStorage, HttpFragments};
use crate::components::sidebar::Sidebar;
use crate::views;

pub type AppRouter = Router<HttpFragments, BrowserHost>;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let content_id = config.content_region_id.clone();

    // Start routing once the shell, and with it the content region, is mounted
    Effect::new(move |_| {
        start_router(&config);
    });

    view! {
        <header class="app-header">
            <button class="menu-btn" on:click=move |_| toggle_sidebar()>"☰"</button>
            <h1 class="app-title">"LiftLog"</h1>
        </header>
        <Sidebar />
        <main id=content_id class="content"></main>
    }
}

fn build_router(config: &AppConfig) -> AppRouter {
    let store = Rc::new(RecordStore::new(BrowserStorage::open(), config.storage.clone()));
    let mut router = Router::new(
        RouteTable::from_config(config),
        HttpFragments,
        BrowserHost::new(&config.content_region_id),
    );
    views::register_all(&mut router, &store);
    router
}

/// Build the router, follow address changes for the life of the page and
/// show the initial view.
fn start_router(config: &AppConfig) {
    let router = Rc::new(build_router(config));
    info!("Router ready with controllers {:?}", router.registered());

    let on_hash_change = {
        let router = router.clone();
        Closure::<dyn FnMut()>::new(move || {
            let router = router.clone();
            spawn_local(async move {
                router.handle_bootstrap().await;
            });
        })
    };
    if let Some(window) = web_sys::window() {
        if let Err(e) = window
            .add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())
        {
            warn!("Back/forward navigation unavailable: {}", describe(&e));
        }
    }
    on_hash_change.forget();

    spawn_local(async move {
        router.handle_bootstrap().await;
    });
}
