//! Native key provider: reads a single configuration key from the
//! application metadata on every call.

use std::sync::Arc;

use tracing::debug;

use crate::error::{log_lookup_error, LookupError};
use crate::metadata::MetadataSource;

/// Metadata name under which the Google Maps SDK expects its API key.
pub const GOOGLE_MAPS_API_KEY_METADATA: &str = "com.google.android.geo.API_KEY";

/// Looks up one fixed metadata key through an injected [`MetadataSource`].
///
/// Nothing is cached: the source is consulted on every call, so the result
/// always reflects the current package record.
#[derive(Clone)]
pub struct NativeKeyProvider {
    source: Arc<dyn MetadataSource>,
    metadata_key: String,
}

impl NativeKeyProvider {
    pub fn new(source: Arc<dyn MetadataSource>, metadata_key: impl Into<String>) -> Self {
        Self {
            source,
            metadata_key: metadata_key.into(),
        }
    }

    /// Provider for the Google Maps API key.
    pub fn google_maps(source: Arc<dyn MetadataSource>) -> Self {
        Self::new(source, GOOGLE_MAPS_API_KEY_METADATA)
    }

    pub fn metadata_key(&self) -> &str {
        &self.metadata_key
    }

    /// Read the key.
    ///
    /// # Errors
    /// - `KeyNotFound` if the bundle or entry is missing, or is not a string
    /// - `RegistryUnavailable` if the package record cannot be read
    pub fn lookup(&self) -> Result<String, LookupError> {
        match self.source.get_string(&self.metadata_key)? {
            Some(value) => {
                debug!(key = %self.metadata_key, "metadata key resolved");
                Ok(value)
            }
            None => Err(LookupError::KeyNotFound {
                key: self.metadata_key.clone(),
            }),
        }
    }

    /// Read the key, folding every failure into `None`.
    ///
    /// This is the shape the Flutter shell sees on the wire: a missing key and
    /// a broken registry are indistinguishable.
    pub fn lookup_or_none(&self) -> Option<String> {
        match self.lookup() {
            Ok(value) => Some(value),
            Err(err) => {
                log_lookup_error(&err, "lookup_or_none");
                None
            }
        }
    }
}

impl std::fmt::Debug for NativeKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeKeyProvider")
            .field("metadata_key", &self.metadata_key)
            .finish_non_exhaustive()
    }
}
