// Public API for flutter_rust_bridge integration
// This module provides FFI functions for Flutter to reach the native bridge

#![allow(dead_code)] // FFI functions are called from Dart, not detected by Rust analyzer

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::context::AppContext;
use crate::error::LookupError;
use crate::logging;

// Re-export error code constants for FFI exposure
pub use crate::error::{BridgeErrorCodes, LookupErrorCodes};

/// Global AppContext instance
///
/// Built on first use from the platform configuration. On Android the
/// metadata source needs the application context registered through
/// `nativeInit` before lookups can succeed.
static APP_CONTEXT: Lazy<AppContext> = Lazy::new(AppContext::new);

/// Initialize logging when the Dart side loads the library
#[flutter_rust_bridge::frb(init)]
pub fn init_app() {
    logging::init_logging(APP_CONTEXT.config().level());
}

/// Get the version of the native bridge
#[flutter_rust_bridge::frb(sync)]
pub fn get_version() -> Result<String> {
    Ok(env!("CARGO_PKG_VERSION").to_string())
}

/// Read the Google Maps API key
///
/// Returns `None` when the key is missing or the package record cannot be
/// read; both cases look the same to the caller.
///
/// # Usage
/// ```dart
/// final key = getGoogleMapsApiKey();
/// if (key == null) showMapsUnavailable();
/// ```
#[flutter_rust_bridge::frb(sync)]
pub fn get_google_maps_api_key() -> Option<String> {
    APP_CONTEXT.google_maps_api_key()
}

/// Read the Google Maps API key, keeping the failure reason
///
/// # Errors
/// - `KeyNotFound` (3001) - no string entry under the metadata key
/// - `RegistryUnavailable` (3002) - the package record could not be read
#[flutter_rust_bridge::frb(sync)]
pub fn lookup_google_maps_api_key() -> Result<String, LookupError> {
    APP_CONTEXT.lookup_google_maps_api_key()
}

/// Deliver an encoded method call to a named channel
///
/// `message` is a JSON method-call envelope. Returns the encoded reply, an
/// empty reply for an unknown method, or `None` for an unknown channel.
#[flutter_rust_bridge::frb(sync)]
pub fn handle_platform_message(channel: String, message: Vec<u8>) -> Option<Vec<u8>> {
    APP_CONTEXT.handle_platform_message(&channel, &message)
}

/// Names of all registered method channels
#[flutter_rust_bridge::frb(sync)]
pub fn registered_channels() -> Vec<String> {
    APP_CONTEXT
        .registry()
        .channel_names()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Get LookupErrorCodes as a structured object with all error code constants
#[flutter_rust_bridge::frb(sync)]
pub fn get_lookup_error_codes() -> LookupErrorCodes {
    LookupErrorCodes {}
}

/// Get BridgeErrorCodes as a structured object with all error code constants
#[flutter_rust_bridge::frb(sync)]
pub fn get_bridge_error_codes() -> BridgeErrorCodes {
    BridgeErrorCodes {}
}
