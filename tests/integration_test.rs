//! Integration tests for the api_keys channel
//!
//! These tests drive the bridge the way the Flutter shell does: encoded
//! method-call envelopes in, encoded replies out, with an injected metadata
//! source standing in for the Android package registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use campus_guide_bridge::bridge::{API_KEYS_CHANNEL, GET_GOOGLE_MAPS_API_KEY};
use campus_guide_bridge::channel::{codec, MethodCall, MethodResponse};
use campus_guide_bridge::config::BridgeConfig;
use campus_guide_bridge::context::AppContext;
use campus_guide_bridge::error::{BridgeErrorCodes, LookupError};
use campus_guide_bridge::metadata::{MetadataSource, StaticMetadataSource};
use campus_guide_bridge::provider::GOOGLE_MAPS_API_KEY_METADATA;
use serde_json::Value;

/// Metadata source that counts lookups and can be told to fail.
struct CountingSource {
    inner: StaticMetadataSource,
    fail: bool,
    lookups: AtomicUsize,
}

impl CountingSource {
    fn with_key(value: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: StaticMetadataSource::from_pairs([(GOOGLE_MAPS_API_KEY_METADATA, value)]),
            fail: false,
            lookups: AtomicUsize::new(0),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            inner: StaticMetadataSource::from_pairs(Vec::<(String, String)>::new()),
            fail: false,
            lookups: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            inner: StaticMetadataSource::without_bundle(),
            fail: true,
            lookups: AtomicUsize::new(0),
        })
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl MetadataSource for CountingSource {
    fn get_string(&self, key: &str) -> Result<Option<String>, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LookupError::RegistryUnavailable {
                reason: "getApplicationInfo threw NameNotFoundException".to_string(),
            });
        }
        self.inner.get_string(key)
    }
}

fn context_with(source: Arc<CountingSource>, strict_errors: bool) -> AppContext {
    let config = BridgeConfig {
        strict_errors,
        ..BridgeConfig::default()
    };
    AppContext::with_source(config, source)
}

fn call_over_wire(ctx: &AppContext, method: &str) -> MethodResponse {
    let message = codec::encode_method_call(&MethodCall::without_arguments(method))
        .expect("encode method call");
    let reply = ctx
        .handle_platform_message(API_KEYS_CHANNEL, &message)
        .expect("api_keys channel registered");
    codec::decode_response(&reply).expect("decode reply")
}

#[test]
fn test_get_key_returns_configured_value() {
    let source = CountingSource::with_key("AIzaXYZ123");
    let ctx = context_with(Arc::clone(&source), false);

    let response = call_over_wire(&ctx, GET_GOOGLE_MAPS_API_KEY);
    assert_eq!(
        response,
        MethodResponse::Success(Value::String("AIzaXYZ123".to_string()))
    );
    assert_eq!(source.lookups(), 1);
}

#[test]
fn test_unknown_method_never_touches_provider() {
    let source = CountingSource::with_key("AIzaXYZ123");
    let ctx = context_with(Arc::clone(&source), false);

    for method in ["doSomethingElse", "getgooglemapsapikey", "", "getGoogleMapsApiKey "] {
        let response = call_over_wire(&ctx, method);
        assert_eq!(
            response,
            MethodResponse::NotImplemented,
            "method {method:?} should not be implemented"
        );
    }
    assert_eq!(source.lookups(), 0);
}

#[test]
fn test_missing_key_returns_null() {
    let ctx = context_with(CountingSource::empty(), false);
    assert_eq!(
        call_over_wire(&ctx, GET_GOOGLE_MAPS_API_KEY),
        MethodResponse::Success(Value::Null)
    );
}

#[test]
fn test_registry_failure_collapses_to_null() {
    let missing = context_with(CountingSource::empty(), false);
    let broken = context_with(CountingSource::failing(), false);

    let missing_reply = call_over_wire(&missing, GET_GOOGLE_MAPS_API_KEY);
    let broken_reply = call_over_wire(&broken, GET_GOOGLE_MAPS_API_KEY);

    // Indistinguishable on the wire...
    assert_eq!(missing_reply, MethodResponse::Success(Value::Null));
    assert_eq!(broken_reply, missing_reply);

    // ...but the provider still reports distinct reasons.
    assert!(matches!(
        missing.lookup_google_maps_api_key(),
        Err(LookupError::KeyNotFound { .. })
    ));
    assert!(matches!(
        broken.lookup_google_maps_api_key(),
        Err(LookupError::RegistryUnavailable { .. })
    ));
}

#[test]
fn test_strict_mode_surfaces_error_codes() {
    let missing = context_with(CountingSource::empty(), true);
    let broken = context_with(CountingSource::failing(), true);

    match call_over_wire(&missing, GET_GOOGLE_MAPS_API_KEY) {
        MethodResponse::Error { code, .. } => assert_eq!(code, "KEY_NOT_FOUND"),
        other => panic!("Expected KEY_NOT_FOUND, got {:?}", other),
    }
    match call_over_wire(&broken, GET_GOOGLE_MAPS_API_KEY) {
        MethodResponse::Error { code, .. } => assert_eq!(code, "REGISTRY_UNAVAILABLE"),
        other => panic!("Expected REGISTRY_UNAVAILABLE, got {:?}", other),
    }
}

#[test]
fn test_repeated_calls_are_idempotent() {
    let source = CountingSource::with_key("AIzaXYZ123");
    let ctx = context_with(Arc::clone(&source), false);

    let first = call_over_wire(&ctx, GET_GOOGLE_MAPS_API_KEY);
    for _ in 0..10 {
        assert_eq!(call_over_wire(&ctx, GET_GOOGLE_MAPS_API_KEY), first);
    }
    // Read on demand, never cached
    assert_eq!(source.lookups(), 11);
}

#[test]
fn test_concurrent_calls_share_context() {
    let source = CountingSource::with_key("AIzaXYZ123");
    let ctx = Arc::new(context_with(Arc::clone(&source), false));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || call_over_wire(&ctx, GET_GOOGLE_MAPS_API_KEY))
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().expect("worker panicked"),
            MethodResponse::success("AIzaXYZ123")
        );
    }
    assert_eq!(source.lookups(), 8);
}

#[test]
fn test_malformed_envelope_gets_error_reply() {
    let ctx = context_with(CountingSource::with_key("AIzaXYZ123"), false);
    let reply = ctx
        .handle_platform_message(API_KEYS_CHANNEL, b"{\"args\": null}")
        .expect("api_keys channel registered");

    match codec::decode_response(&reply).expect("decode reply") {
        MethodResponse::Error { code, details, .. } => {
            assert_eq!(code, "MALFORMED_CALL");
            assert_eq!(details, Value::from(BridgeErrorCodes::MALFORMED_CALL));
        }
        other => panic!("Expected MALFORMED_CALL, got {:?}", other),
    }
}
