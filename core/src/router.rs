//! Hash-token view router.
//!
//! A navigation resolves a token to a route, fetches the route's HTML
//! fragment, swaps it into the content region and replaces the active view
//! controller. The router owns the only reference to the active controller,
//! so at most one is ever attached, and it always tears the old one down
//! before building the next.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::render::render_error_panel;

/// Source of view fragments, normally an HTTP `GET`.
#[allow(async_fn_in_trait)]
pub trait FragmentSource {
    async fn fetch_fragment(&self, path: &str) -> Result<String, FetchError>;
}

/// The page the router drives.
pub trait ViewHost {
    /// Replace the markup of the content region.
    fn set_content(&self, html: &str);
    /// Close any open sidebar or overlay.
    fn close_overlay(&self);
    /// Token currently shown in the address bar, empty if none.
    fn current_token(&self) -> String;
    /// Show `token` in the address bar without reloading, adding a history entry.
    fn push_token(&self, token: &str);
    /// Show `token` in the address bar in place of the current entry.
    fn replace_token(&self, token: &str);
}

/// Behavior attached to one view. Built fresh for every navigation.
pub trait ViewController {
    /// Bind to the freshly injected fragment and paint initial state.
    fn mount(&mut self) -> Result<(), String>;
    /// Release listeners and any state. Called exactly once per mounted controller.
    fn teardown(&mut self);
}

pub type ControllerFactory = Box<dyn Fn() -> Box<dyn ViewController>>;

/// Extract the navigation token from an address fragment such as `#/record`.
pub fn token_from_hash(hash: &str) -> &str {
    hash.trim()
        .trim_start_matches('#')
        .trim_start_matches('/')
        .trim_end_matches('/')
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub token: String,
    pub fragment: String,
    pub controller: Option<String>,
}

/// Static token → route mapping with a fallback route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
    default_token: String,
}

impl RouteTable {
    /// Build from configuration. The configuration must already have been
    /// validated so that the default token is routed.
    pub fn from_config(config: &AppConfig) -> Self {
        let routes = config
            .routes
            .iter()
            .map(|r| {
                (
                    r.token.clone(),
                    Route {
                        token: r.token.clone(),
                        fragment: r.fragment.clone(),
                        controller: r.controller.clone(),
                    },
                )
            })
            .collect();
        Self {
            routes,
            default_token: config.default_token.clone(),
        }
    }

    pub fn default_token(&self) -> &str {
        &self.default_token
    }

    /// Route for `token`, or the default route when the token is empty or
    /// unknown. Returns None only for a table without a default route.
    pub fn resolve(&self, token: &str) -> Option<&Route> {
        self.routes
            .get(token)
            .or_else(|| self.routes.get(&self.default_token))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Fragment shown; `controller` is the key of the newly attached controller.
    Rendered {
        token: String,
        controller: Option<String>,
    },
    /// Fragment failed to load; the error panel is shown and the previous
    /// controller is untouched.
    Failed { token: String, error: FetchError },
    /// A later navigation started before this one's fragment arrived.
    Superseded { token: String },
    /// The table has no route for the token nor a default.
    Unrouted { token: String },
}

struct ActiveController {
    key: String,
    controller: Box<dyn ViewController>,
}

pub struct Router<F, H> {
    table: RouteTable,
    factories: HashMap<String, ControllerFactory>,
    fragments: F,
    host: H,
    active: RefCell<Option<ActiveController>>,
    generation: Cell<u64>,
}

impl<F: FragmentSource, H: ViewHost> Router<F, H> {
    pub fn new(table: RouteTable, fragments: F, host: H) -> Self {
        Self {
            table,
            factories: HashMap::new(),
            fragments,
            host,
            active: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// Register the factory for controller `key`. Routes name controllers by key.
    pub fn register<C>(&mut self, key: &str, factory: C)
    where
        C: Fn() -> Box<dyn ViewController> + 'static,
    {
        self.factories.insert(key.to_string(), Box::new(factory));
    }

    pub fn registered(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Key of the attached controller, if any.
    pub fn active_controller(&self) -> Option<String> {
        self.active.borrow().as_ref().map(|a| a.key.clone())
    }

    /// Show the view for `token`.
    pub async fn navigate(&self, token: &str) -> NavigationOutcome {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let Some(route) = self.table.resolve(token).cloned() else {
            error!("No route for '{}' and no default route", token);
            return NavigationOutcome::Unrouted {
                token: token.to_string(),
            };
        };
        if route.token != token {
            debug!("Unknown view '{}', using '{}'", token, route.token);
        }

        let fetched = self.fragments.fetch_fragment(&route.fragment).await;
        if self.generation.get() != generation {
            debug!("Dropping stale fragment for '{}'", route.token);
            return NavigationOutcome::Superseded { token: route.token };
        }

        let outcome = match fetched {
            Ok(html) => {
                self.host.set_content(&html);
                let controller = self.attach(&route);
                info!("Showing view '{}'", route.token);
                NavigationOutcome::Rendered {
                    token: route.token.clone(),
                    controller,
                }
            }
            Err(e) => {
                error!("Navigation to '{}' failed: {}", route.token, e);
                self.host.set_content(&render_error_panel(&e));
                NavigationOutcome::Failed {
                    token: route.token.clone(),
                    error: e,
                }
            }
        };

        self.host.close_overlay();
        if route.token != token {
            // Fallback rewrites the current entry instead of adding one.
            self.host.replace_token(&route.token);
        } else if self.host.current_token() != route.token {
            self.host.push_token(&route.token);
        }
        outcome
    }

    /// Navigate to whatever the address bar currently shows. Used at startup
    /// and on back/forward.
    pub async fn handle_bootstrap(&self) -> NavigationOutcome {
        let token = self.host.current_token();
        self.navigate(&token).await
    }

    /// Tear down the active controller, then build and mount the route's one.
    fn attach(&self, route: &Route) -> Option<String> {
        let previous = self.active.borrow_mut().take();
        if let Some(mut previous) = previous {
            previous.controller.teardown();
            debug!("Detached controller '{}'", previous.key);
        }

        let key = route.controller.as_ref()?;
        let Some(factory) = self.factories.get(key) else {
            warn!("Route '{}' names unregistered controller '{}'", route.token, key);
            return None;
        };

        let mut controller = factory();
        if let Err(e) = controller.mount() {
            error!("Controller '{}' failed to mount: {}", key, e);
            controller.teardown();
            return None;
        }

        *self.active.borrow_mut() = Some(ActiveController {
            key: key.clone(),
            controller,
        });
        debug!("Attached controller '{}'", key);
        Some(key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_hash() {
        assert_eq!(token_from_hash("#/record"), "record");
        assert_eq!(token_from_hash("#record"), "record");
        assert_eq!(token_from_hash("#/stats/"), "stats");
        assert_eq!(token_from_hash("#/"), "");
        assert_eq!(token_from_hash(""), "");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let table = RouteTable::from_config(&AppConfig::default());
        assert_eq!(table.resolve("record").unwrap().fragment, "views/record.html");
        assert_eq!(table.resolve("").unwrap().token, "home");
        assert_eq!(table.resolve("nope").unwrap().token, "home");
        assert_eq!(table.default_token(), "home");
    }

    #[test]
    fn test_resolve_without_default_route() {
        let config = AppConfig {
            default_token: "gone".to_string(),
            ..AppConfig::default()
        };
        let table = RouteTable::from_config(&config);
        assert!(table.resolve("gone").is_none());
        assert!(table.resolve("stats").is_some());
    }
}
