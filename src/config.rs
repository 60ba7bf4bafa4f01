//! Configuration management for the native bridge
//!
//! Runtime configuration is loaded from a JSON file so desktop tooling and
//! tests can point the bridge at a different package record or switch on
//! strict error replies without recompiling. Every field has a default that
//! matches what the Flutter shell expects.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bridge::{ApiKeysOptions, API_KEYS_CHANNEL};
use crate::provider::GOOGLE_MAPS_API_KEY_METADATA;

/// Complete bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the api_keys method channel
    pub channel_name: String,
    /// Metadata entry holding the Google Maps API key
    pub metadata_key: String,
    /// Reply with error envelopes instead of null on lookup failures
    pub strict_errors: bool,
    /// Desktop package record (ignored on Android)
    pub metadata_path: String,
    /// Maximum log level: trace, debug, info, warn or error
    pub log_level: String,
}

impl Default for BridgeConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            channel_name: API_KEYS_CHANNEL.to_string(),
            metadata_key: GOOGLE_MAPS_API_KEY_METADATA.to_string(),
            strict_errors: false,
            metadata_path: "assets/app_metadata.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration on Android
    ///
    /// Flutter assets live inside the APK and are only reachable through the
    /// AssetManager, so Android builds run on defaults.
    #[cfg(target_os = "android")]
    pub fn load() -> Self {
        log::info!("[Config] Using default configuration on Android");
        Self::default()
    }

    /// Load configuration for non-Android platforms
    ///
    /// `CAMPUS_BRIDGE_CONFIG` overrides the default location.
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        let path = std::env::var("CAMPUS_BRIDGE_CONFIG")
            .unwrap_or_else(|_| "assets/bridge_config.json".to_string());
        Self::load_from_file(path)
    }

    pub fn api_keys_options(&self) -> ApiKeysOptions {
        ApiKeysOptions {
            strict_errors: self.strict_errors,
        }
    }

    /// Parsed log level, falling back to INFO on unknown names.
    pub fn level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
