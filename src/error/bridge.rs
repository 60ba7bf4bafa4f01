// Method channel error types and constants

use crate::error::ErrorCode;
use flutter_rust_bridge::frb;
use std::fmt;
use tracing::error;

/// Bridge error code constants exposed to Dart via FFI
///
/// Error code range: 3101-3103
#[frb(unignore)]
pub struct BridgeErrorCodes {}

#[frb]
impl BridgeErrorCodes {
    /// Incoming method call envelope could not be decoded
    pub const MALFORMED_CALL: i32 = 3101;

    /// Reply envelope could not be decoded
    pub const MALFORMED_RESPONSE: i32 = 3102;

    /// Value could not be serialized into an envelope
    pub const ENCODING: i32 = 3103;

    /// Get MALFORMED_CALL error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn malformed_call() -> i32 {
        Self::MALFORMED_CALL
    }

    /// Get MALFORMED_RESPONSE error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn malformed_response() -> i32 {
        Self::MALFORMED_RESPONSE
    }

    /// Get ENCODING error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn encoding() -> i32 {
        Self::ENCODING
    }
}

/// Log a bridge error with structured context
pub fn log_bridge_error(err: &BridgeError, channel: &str) {
    error!(
        code = err.code(),
        component = "MethodChannel",
        channel,
        "{}",
        err.message()
    );
}

/// Errors raised while encoding or decoding method channel envelopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    MalformedCall { reason: String },
    MalformedResponse { reason: String },
    Encoding { reason: String },
}

impl BridgeError {
    /// Error code carried in method-channel error envelopes
    pub fn wire_code(&self) -> &'static str {
        match self {
            BridgeError::MalformedCall { .. } => "MALFORMED_CALL",
            BridgeError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            BridgeError::Encoding { .. } => "ENCODING",
        }
    }
}

impl ErrorCode for BridgeError {
    fn code(&self) -> i32 {
        match self {
            BridgeError::MalformedCall { .. } => BridgeErrorCodes::MALFORMED_CALL,
            BridgeError::MalformedResponse { .. } => BridgeErrorCodes::MALFORMED_RESPONSE,
            BridgeError::Encoding { .. } => BridgeErrorCodes::ENCODING,
        }
    }

    fn message(&self) -> String {
        match self {
            BridgeError::MalformedCall { reason } => format!("Malformed method call: {}", reason),
            BridgeError::MalformedResponse { reason } => {
                format!("Malformed method response: {}", reason)
            }
            BridgeError::Encoding { reason } => format!("Envelope encoding failed: {}", reason),
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BridgeError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for BridgeError {}
