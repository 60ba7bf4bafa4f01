//! Named method channels.
//!
//! A [`MethodChannel`] maps method names to handlers. Dispatch is a plain
//! table lookup: new methods are added with [`MethodChannel::register`]
//! rather than by growing a branching chain. Calls are handled synchronously
//! on the caller's thread and no state is carried between calls.

pub mod codec;
pub mod registry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{log_bridge_error, BridgeError, ErrorCode};

pub use registry::ChannelRegistry;

/// A single method invocation received on a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    /// Opaque argument payload; `Value::Null` when the caller sent none.
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    pub fn without_arguments(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }
}

/// Outcome of a method call.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    /// The handler completed; the value may be `Value::Null`.
    Success(Value),
    /// The handler reported a failure.
    Error {
        code: String,
        message: Option<String>,
        details: Value,
    },
    /// No handler is registered for the method.
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        MethodResponse::Success(value.into())
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        MethodResponse::Error {
            code: code.into(),
            message: Some(message.into()),
            details: Value::Null,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, MethodResponse::NotImplemented)
    }
}

/// Handler invoked for a registered method name.
pub type MethodHandler = Arc<dyn Fn(&MethodCall) -> MethodResponse + Send + Sync>;

/// A named request/response channel.
#[derive(Clone)]
pub struct MethodChannel {
    name: String,
    handlers: HashMap<String, MethodHandler>,
}

impl MethodChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a handler, replacing any previous handler for `method`.
    pub fn register<F>(&mut self, method: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&MethodCall) -> MethodResponse + Send + Sync + 'static,
    {
        let method = method.into();
        if self.handlers.insert(method.clone(), Arc::new(handler)).is_some() {
            debug!(channel = %self.name, method = %method, "replaced method handler");
        }
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_method<F>(mut self, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&MethodCall) -> MethodResponse + Send + Sync + 'static,
    {
        self.register(method, handler);
        self
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Dispatch a decoded call. Unknown methods yield `NotImplemented`
    /// without invoking any handler.
    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        match self.handlers.get(&call.method) {
            Some(handler) => {
                trace!(channel = %self.name, method = %call.method, "dispatching method call");
                handler(call)
            }
            None => {
                debug!(channel = %self.name, method = %call.method, "method not implemented");
                MethodResponse::NotImplemented
            }
        }
    }

    /// Decode, dispatch and encode a raw channel message.
    pub fn handle_message(&self, message: &[u8]) -> Vec<u8> {
        let response = match codec::decode_method_call(message) {
            Ok(call) => self.handle(&call),
            Err(err) => {
                log_bridge_error(&err, &self.name);
                bridge_error_response(&err)
            }
        };

        codec::encode_response(&response).unwrap_or_else(|err| {
            log_bridge_error(&err, &self.name);
            // Error envelopes hold only strings and integers, so this cannot fail twice.
            codec::encode_response(&bridge_error_response(&err)).unwrap_or_default()
        })
    }
}

/// Error envelope for a bridge failure, shaped like the strict lookup replies:
/// the plain message plus the numeric code in `details`.
fn bridge_error_response(err: &BridgeError) -> MethodResponse {
    MethodResponse::Error {
        code: err.wire_code().to_string(),
        message: Some(err.message()),
        details: Value::from(err.code()),
    }
}

impl fmt::Debug for MethodChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodChannel")
            .field("name", &self.name)
            .field("methods", &self.methods())
            .finish()
    }
}
