//! The `concordia_campus_guide/api_keys` channel.
//!
//! Exposes the Google Maps API key to the Flutter shell. By default a failed
//! lookup is reported as a successful `null` reply, which is what the shell
//! has always received. Strict mode turns the two failure kinds into error
//! replies the shell can branch on.

use serde_json::Value;
use tracing::info;

use crate::channel::{MethodChannel, MethodResponse};
use crate::error::{log_lookup_error, ErrorCode};
use crate::provider::NativeKeyProvider;

/// Channel name the Flutter shell listens on.
pub const API_KEYS_CHANNEL: &str = "concordia_campus_guide/api_keys";

/// Method returning the Google Maps API key.
pub const GET_GOOGLE_MAPS_API_KEY: &str = "getGoogleMapsApiKey";

/// Behaviour switches for the api_keys channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiKeysOptions {
    /// Reply with an error envelope instead of `null` when the lookup fails.
    pub strict_errors: bool,
}

/// Build the api_keys channel under its standard name.
pub fn api_keys_channel(provider: NativeKeyProvider, options: ApiKeysOptions) -> MethodChannel {
    api_keys_channel_named(API_KEYS_CHANNEL, provider, options)
}

/// Build the api_keys channel under a custom name.
pub fn api_keys_channel_named(
    name: impl Into<String>,
    provider: NativeKeyProvider,
    options: ApiKeysOptions,
) -> MethodChannel {
    let channel = MethodChannel::new(name);
    info!(
        channel = channel.name(),
        metadata_key = provider.metadata_key(),
        strict_errors = options.strict_errors,
        "api_keys channel ready"
    );

    channel.with_method(GET_GOOGLE_MAPS_API_KEY, move |_call| {
        google_maps_key_response(&provider, options)
    })
}

fn google_maps_key_response(provider: &NativeKeyProvider, options: ApiKeysOptions) -> MethodResponse {
    match provider.lookup() {
        Ok(key) => MethodResponse::Success(Value::String(key)),
        Err(err) => {
            log_lookup_error(&err, GET_GOOGLE_MAPS_API_KEY);
            if options.strict_errors {
                MethodResponse::Error {
                    code: err.wire_code().to_string(),
                    message: Some(err.message()),
                    details: Value::from(err.code()),
                }
            } else {
                MethodResponse::Success(Value::Null)
            }
        }
    }
}
