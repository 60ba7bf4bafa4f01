// Error types for the campus guide native bridge
//
// This module defines custom error types for metadata lookups and method
// channel envelopes, with numeric codes suitable for FFI communication.

mod bridge;
mod lookup;

pub use bridge::{log_bridge_error, BridgeError, BridgeErrorCodes};
pub use lookup::{log_lookup_error, LookupError, LookupErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
