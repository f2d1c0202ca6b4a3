use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Keys of the two collections in durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub exercises: String,
    pub records: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            exercises: "myhealth_exercises".to_string(),
            records: "myhealth_records".to_string(),
        }
    }
}

/// One navigation token and what it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub token: String,
    pub fragment: String,
    #[serde(default)]
    pub controller: Option<String>,
}

impl RouteConfig {
    fn new(token: &str, fragment: &str, controller: Option<&str>) -> Self {
        Self {
            token: token.to_string(),
            fragment: fragment.to_string(),
            controller: controller.map(str::to_string),
        }
    }
}

/// Application configuration. Every field has a default so a partial JSON
/// document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageKeys,
    pub content_region_id: String,
    pub default_token: String,
    pub routes: Vec<RouteConfig>,
    pub log_level: String,
    /// Script registered as the asset cache worker, if any.
    pub service_worker: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            content_region_id: "main-content".to_string(),
            default_token: "home".to_string(),
            routes: vec![
                RouteConfig::new("home", "views/home.html", None),
                RouteConfig::new("record", "views/record.html", Some("record")),
                RouteConfig::new("stats", "views/stats.html", Some("stats")),
                RouteConfig::new("settings", "views/settings.html", Some("settings")),
            ],
            log_level: "info".to_string(),
            service_worker: Some("service-worker.js".to_string()),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an optional embedded document, falling back to defaults when it
    /// is missing or malformed.
    pub fn from_embedded(json: Option<&str>) -> Self {
        match json.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(text) => Self::from_json(text).unwrap_or_else(|e| {
                warn!("Ignoring app config: {}", e);
                Self::default()
            }),
        }
    }

    /// Check the route table against the controllers the application
    /// registers.
    pub fn validate(&self, known_controllers: &[&str]) -> Result<(), ConfigError> {
        if !self.routes.iter().any(|r| r.token == self.default_token) {
            return Err(ConfigError::UnroutedDefault(self.default_token.clone()));
        }
        for route in &self.routes {
            if let Some(controller) = &route.controller {
                if !known_controllers.contains(&controller.as_str()) {
                    return Err(ConfigError::UnknownController {
                        token: route.token.clone(),
                        controller: controller.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
