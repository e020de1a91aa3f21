use std::time::Duration;

use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

pub const APP_ID: &str = "dev.notepin.app";
pub const CONFIG_VERSION: u64 = 1;

/// Minimum poll interval accepted from config; anything lower hammers the API.
const MIN_POLL_MS: u64 = 250;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct NotepinConfig {
    /// Firestore project id. Empty means an in-memory collection for this session.
    pub firestore_project: String,
    pub firestore_api_key: String,
    pub collection: String,
    pub poll_interval_ms: u64,
    pub search_debounce_ms: u64,
    pub debug_logging: bool,
}

impl Default for NotepinConfig {
    fn default() -> Self {
        Self {
            firestore_project: String::new(),
            firestore_api_key: String::new(),
            collection: "notes".into(),
            poll_interval_ms: 2000,
            search_debounce_ms: 300,
            debug_logging: false,
        }
    }
}

impl NotepinConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_MS))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Load from cosmic-config, falling back to defaults for anything missing or invalid.
    pub fn load() -> (Self, Option<cosmic_config::Config>) {
        match cosmic_config::Config::new(APP_ID, CONFIG_VERSION) {
            Ok(handle) => {
                let config = Self::get_entry(&handle).unwrap_or_else(|(errs, cfg)| {
                    for e in errs {
                        log::warn!("Config entry invalid, using default: {:?}", e);
                    }
                    cfg
                });
                (config, Some(handle))
            }
            Err(e) => {
                log::error!("Failed to open config: {:?}", e);
                (Self::default(), None)
            }
        }
    }
}
