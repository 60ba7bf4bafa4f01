use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LookupError;

use super::{MetadataBundle, MetadataSource};

/// On-disk stand-in for an installed package's registry record.
///
/// ```json
/// {
///   "package_name": "com.example.concordia_campus_guide",
///   "meta_data": { "com.google.android.geo.API_KEY": "AIza..." }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub meta_data: Option<MetadataBundle>,
}

/// Desktop metadata source backed by a JSON package record.
///
/// The file is re-read on every lookup so edits are picked up without a
/// restart, mirroring how the Android registry is queried live.
#[derive(Debug, Clone)]
pub struct JsonFileMetadataSource {
    path: PathBuf,
}

impl JsonFileMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the package record.
    pub fn read_record(&self) -> Result<PackageRecord, LookupError> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            LookupError::RegistryUnavailable {
                reason: format!("failed to read {}: {}", self.path.display(), err),
            }
        })?;

        serde_json::from_str(&contents).map_err(|err| LookupError::RegistryUnavailable {
            reason: format!("invalid package record {}: {}", self.path.display(), err),
        })
    }
}

impl MetadataSource for JsonFileMetadataSource {
    fn get_string(&self, key: &str) -> Result<Option<String>, LookupError> {
        let record = self.read_record()?;
        debug!(
            path = %self.path.display(),
            package = record.package_name.as_deref().unwrap_or("<unknown>"),
            "read package record"
        );

        Ok(record
            .meta_data
            .as_ref()
            .and_then(|bundle| bundle.get_string(key))
            .map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KEY: &str = "com.google.android.geo.API_KEY";

    fn write_record(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_string_entry() {
        let file = write_record(
            r#"{"package_name": "com.example.concordia_campus_guide",
                "meta_data": {"com.google.android.geo.API_KEY": "AIzaXYZ123"}}"#,
        );
        let source = JsonFileMetadataSource::new(file.path());
        assert_eq!(
            source.get_string(KEY).unwrap(),
            Some("AIzaXYZ123".to_string())
        );
    }

    #[test]
    fn test_missing_bundle_is_absent() {
        let file = write_record(r#"{"package_name": "com.example.concordia_campus_guide"}"#);
        let source = JsonFileMetadataSource::new(file.path());
        assert_eq!(source.get_string(KEY).unwrap(), None);
    }

    #[test]
    fn test_non_string_entry_is_absent() {
        let file = write_record(r#"{"meta_data": {"com.google.android.geo.API_KEY": 12}}"#);
        let source = JsonFileMetadataSource::new(file.path());
        assert_eq!(source.get_string(KEY).unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_registry_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileMetadataSource::new(dir.path().join("absent.json"));
        match source.get_string(KEY) {
            Err(LookupError::RegistryUnavailable { reason }) => {
                assert!(reason.contains("absent.json"));
            }
            other => panic!("Expected RegistryUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_file_is_registry_failure() {
        let file = write_record("{not json");
        let source = JsonFileMetadataSource::new(file.path());
        assert!(matches!(
            source.get_string(KEY),
            Err(LookupError::RegistryUnavailable { .. })
        ));
    }

    #[test]
    fn test_edits_are_seen_without_restart() {
        let file = write_record(r#"{"meta_data": {}}"#);
        let source = JsonFileMetadataSource::new(file.path());
        assert_eq!(source.get_string(KEY).unwrap(), None);

        fs::write(
            file.path(),
            r#"{"meta_data": {"com.google.android.geo.API_KEY": "fresh"}}"#,
        )
        .unwrap();
        assert_eq!(source.get_string(KEY).unwrap(), Some("fresh".to_string()));
    }
}
