// ChannelRegistry: routes raw platform messages to named method channels
//
// This is the native half of Flutter's binary messenger. A reply of `None`
// means no channel is listening, which the Dart side reports as
// MissingPluginException.

use std::collections::HashMap;

use tracing::warn;

use super::{MethodCall, MethodChannel, MethodResponse};

/// Registry of method channels keyed by channel name.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, MethodChannel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel, replacing any channel with the same name.
    pub fn register(&mut self, channel: MethodChannel) -> &mut Self {
        let name = channel.name().to_string();
        if self.channels.insert(name.clone(), channel).is_some() {
            warn!(channel = %name, "replaced existing method channel");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&MethodChannel> {
        self.channels.get(name)
    }

    /// Registered channel names, sorted.
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Deliver an encoded message. Returns `None` for an unknown channel.
    pub fn send(&self, channel: &str, message: &[u8]) -> Option<Vec<u8>> {
        match self.channels.get(channel) {
            Some(target) => Some(target.handle_message(message)),
            None => {
                warn!(channel, "message for unregistered channel dropped");
                None
            }
        }
    }

    /// Dispatch an already decoded call. An unknown channel behaves like an
    /// unknown method.
    pub fn invoke(&self, channel: &str, call: &MethodCall) -> MethodResponse {
        self.channels
            .get(channel)
            .map(|target| target.handle(call))
            .unwrap_or(MethodResponse::NotImplemented)
    }
}
