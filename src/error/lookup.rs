// Metadata lookup error types and constants

use crate::error::ErrorCode;
use flutter_rust_bridge::frb;
use std::fmt;
use tracing::warn;

/// Lookup error code constants exposed to Dart via FFI
///
/// Error code range: 3001-3002
#[frb(unignore)]
pub struct LookupErrorCodes {}

#[frb]
impl LookupErrorCodes {
    /// Metadata key is absent or does not hold a string
    pub const KEY_NOT_FOUND: i32 = 3001;

    /// The package registry record could not be read
    pub const REGISTRY_UNAVAILABLE: i32 = 3002;

    /// Get KEY_NOT_FOUND error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn key_not_found() -> i32 {
        Self::KEY_NOT_FOUND
    }

    /// Get REGISTRY_UNAVAILABLE error code
    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn registry_unavailable() -> i32 {
        Self::REGISTRY_UNAVAILABLE
    }
}

/// Log a lookup error with structured context
///
/// Lookup failures are expected on misconfigured builds, so they are
/// reported at warn level rather than error.
pub fn log_lookup_error(err: &LookupError, context: &str) {
    warn!(
        code = err.code(),
        component = "NativeKeyProvider",
        context,
        "{}",
        err.message()
    );
}

/// Errors raised while reading a value from the application metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The key is absent, the bundle is missing, or the value is not a string
    KeyNotFound { key: String },

    /// The registry lookup itself failed
    RegistryUnavailable { reason: String },
}

impl LookupError {
    /// Error code carried in method-channel error envelopes
    pub fn wire_code(&self) -> &'static str {
        match self {
            LookupError::KeyNotFound { .. } => "KEY_NOT_FOUND",
            LookupError::RegistryUnavailable { .. } => "REGISTRY_UNAVAILABLE",
        }
    }
}

impl ErrorCode for LookupError {
    fn code(&self) -> i32 {
        match self {
            LookupError::KeyNotFound { .. } => LookupErrorCodes::KEY_NOT_FOUND,
            LookupError::RegistryUnavailable { .. } => LookupErrorCodes::REGISTRY_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            LookupError::KeyNotFound { key } => {
                format!("Metadata key '{}' not found in application record", key)
            }
            LookupError::RegistryUnavailable { reason } => {
                format!("Package registry unavailable: {}", reason)
            }
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LookupError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for LookupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_codes() {
        assert_eq!(
            LookupError::KeyNotFound {
                key: "k".to_string()
            }
            .code(),
            LookupErrorCodes::KEY_NOT_FOUND
        );
        assert_eq!(
            LookupError::RegistryUnavailable {
                reason: "test".to_string()
            }
            .code(),
            LookupErrorCodes::REGISTRY_UNAVAILABLE
        );
    }

    #[test]
    fn test_lookup_error_messages() {
        let err = LookupError::KeyNotFound {
            key: "com.google.android.geo.API_KEY".to_string(),
        };
        assert!(err.message().contains("com.google.android.geo.API_KEY"));

        let err = LookupError::RegistryUnavailable {
            reason: "NameNotFoundException".to_string(),
        };
        assert_eq!(
            err.message(),
            "Package registry unavailable: NameNotFoundException"
        );
    }

    #[test]
    fn test_wire_codes_are_distinct() {
        let missing = LookupError::KeyNotFound { key: String::new() };
        let broken = LookupError::RegistryUnavailable {
            reason: String::new(),
        };
        assert_eq!(missing.wire_code(), "KEY_NOT_FOUND");
        assert_eq!(broken.wire_code(), "REGISTRY_UNAVAILABLE");
    }

    #[test]
    fn test_display_includes_code() {
        let err = LookupError::RegistryUnavailable {
            reason: "boom".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("LookupError"));
        assert!(display.contains("3002"));
    }

    #[test]
    fn test_error_code_getters() {
        assert_eq!(LookupErrorCodes::key_not_found(), 3001);
        assert_eq!(LookupErrorCodes::registry_unavailable(), 3002);
    }
}
