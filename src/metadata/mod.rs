//! Read-only access to the installed package's application metadata.
//!
//! The host platform owns the metadata (on Android it lives in the package
//! registry record), so the bridge only ever sees it through the
//! [`MetadataSource`] trait. Platform sources are selected at compile time;
//! tests and desktop tooling inject their own.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

#[cfg(target_os = "android")]
mod android;
#[cfg(target_os = "android")]
pub use android::{register_android_context, AndroidPackageMetadata};

mod json_file;
pub use json_file::{JsonFileMetadataSource, PackageRecord};

/// Trait implemented by every application-metadata backend.
pub trait MetadataSource: Send + Sync {
    /// Read a string entry from the application metadata.
    ///
    /// * `Ok(Some(value))` - the entry exists and holds a string
    /// * `Ok(None)` - no bundle, no entry, or the entry is not a string
    /// * `Err(LookupError::RegistryUnavailable)` - the record could not be read
    fn get_string(&self, key: &str) -> Result<Option<String>, LookupError>;
}

/// A single typed metadata entry.
///
/// Manifest `<meta-data>` entries may carry strings, integers, booleans or
/// floats. Only string entries satisfy a string lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Key-value metadata attached to an application record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataBundle {
    entries: BTreeMap<String, MetadataValue>,
}

impl MetadataBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Builder-style insert of a string entry.
    pub fn with_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(key, MetadataValue::String(value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    /// Same contract as Android's `Bundle.getString`: non-string entries read as absent.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(MetadataValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |bundle, (k, v)| bundle.with_string(k, v))
    }
}

/// In-memory metadata source.
///
/// Used by tests and by desktop tooling that already holds the metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataSource {
    bundle: Option<MetadataBundle>,
}

impl StaticMetadataSource {
    pub fn new(bundle: MetadataBundle) -> Self {
        Self {
            bundle: Some(bundle),
        }
    }

    /// Source whose application record carries no metadata bundle at all.
    pub fn without_bundle() -> Self {
        Self { bundle: None }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(pairs.into_iter().collect())
    }
}

impl MetadataSource for StaticMetadataSource {
    fn get_string(&self, key: &str) -> Result<Option<String>, LookupError> {
        Ok(self
            .bundle
            .as_ref()
            .and_then(|bundle| bundle.get_string(key))
            .map(str::to_owned))
    }
}

/// Platform default metadata source.
///
/// Android reads the live package record; every other target reads the
/// JSON package record at `desktop_path`.
pub fn default_source(desktop_path: impl AsRef<Path>) -> Arc<dyn MetadataSource> {
    #[cfg(target_os = "android")]
    {
        let _ = desktop_path;
        Arc::new(AndroidPackageMetadata::new())
    }

    #[cfg(not(target_os = "android"))]
    {
        Arc::new(JsonFileMetadataSource::new(desktop_path.as_ref()))
    }
}
