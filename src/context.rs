// AppContext: Dependency Injection Container
// Owns the configuration, the key provider and every registered channel

use std::sync::Arc;

use tracing::info;

use crate::bridge::api_keys_channel_named;
use crate::channel::{ChannelRegistry, MethodCall, MethodResponse};
use crate::config::BridgeConfig;
use crate::error::LookupError;
use crate::metadata::{default_source, MetadataSource};
use crate::provider::NativeKeyProvider;

/// AppContext: dependency injection container for the bridge
///
/// Everything is immutable after construction, so the context can be shared
/// across threads without locking. Tests build one with
/// [`AppContext::with_source`] to substitute a fake metadata source.
pub struct AppContext {
    config: BridgeConfig,
    provider: NativeKeyProvider,
    registry: ChannelRegistry,
}

impl AppContext {
    /// Create a context from the platform configuration and metadata source
    pub fn new() -> Self {
        let config = BridgeConfig::load();
        let source = default_source(&config.metadata_path);
        Self::with_source(config, source)
    }

    /// Create a context around an injected metadata source
    pub fn with_source(config: BridgeConfig, source: Arc<dyn MetadataSource>) -> Self {
        let provider = NativeKeyProvider::new(source, config.metadata_key.clone());

        let mut registry = ChannelRegistry::new();
        registry.register(api_keys_channel_named(
            config.channel_name.clone(),
            provider.clone(),
            config.api_keys_options(),
        ));

        info!(channels = ?registry.channel_names(), "bridge context initialized");

        Self {
            config,
            provider,
            registry,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Google Maps API key, or `None` if it cannot be read for any reason
    pub fn google_maps_api_key(&self) -> Option<String> {
        self.provider.lookup_or_none()
    }

    /// Google Maps API key with the failure reason preserved
    pub fn lookup_google_maps_api_key(&self) -> Result<String, LookupError> {
        self.provider.lookup()
    }

    /// Deliver an encoded platform message; `None` if no channel has that name
    pub fn handle_platform_message(&self, channel: &str, message: &[u8]) -> Option<Vec<u8>> {
        self.registry.send(channel, message)
    }

    /// Dispatch a decoded call on a channel
    pub fn invoke(&self, channel: &str, call: &MethodCall) -> MethodResponse {
        self.registry.invoke(channel, call)
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{API_KEYS_CHANNEL, GET_GOOGLE_MAPS_API_KEY};
    use crate::metadata::StaticMetadataSource;
    use crate::provider::GOOGLE_MAPS_API_KEY_METADATA;

    fn context(pairs: &[(&str, &str)]) -> AppContext {
        AppContext::with_source(
            BridgeConfig::default(),
            Arc::new(StaticMetadataSource::from_pairs(pairs.iter().copied())),
        )
    }

    #[test]
    fn test_registers_api_keys_channel() {
        let ctx = context(&[]);
        assert_eq!(ctx.registry().channel_names(), vec![API_KEYS_CHANNEL]);
    }

    #[test]
    fn test_direct_and_channel_lookups_agree() {
        let ctx = context(&[(GOOGLE_MAPS_API_KEY_METADATA, "AIzaXYZ123")]);
        assert_eq!(ctx.google_maps_api_key(), Some("AIzaXYZ123".to_string()));
        assert_eq!(
            ctx.invoke(
                API_KEYS_CHANNEL,
                &MethodCall::without_arguments(GET_GOOGLE_MAPS_API_KEY)
            ),
            MethodResponse::success("AIzaXYZ123")
        );
    }

    #[test]
    fn test_missing_key_reports_reason() {
        let ctx = context(&[]);
        assert_eq!(ctx.google_maps_api_key(), None);
        assert!(matches!(
            ctx.lookup_google_maps_api_key(),
            Err(LookupError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_custom_channel_name_and_key() {
        let config = BridgeConfig {
            channel_name: "custom/keys".to_string(),
            metadata_key: "custom.key".to_string(),
            ..BridgeConfig::default()
        };
        let ctx = AppContext::with_source(
            config,
            Arc::new(StaticMetadataSource::from_pairs([("custom.key", "v")])),
        );

        let reply = ctx
            .handle_platform_message("custom/keys", br#"{"method": "getGoogleMapsApiKey"}"#)
            .unwrap();
        assert_eq!(reply, br#"["v"]"#);
        assert!(ctx
            .handle_platform_message(API_KEYS_CHANNEL, br#"{"method": "getGoogleMapsApiKey"}"#)
            .is_none());
    }
}
