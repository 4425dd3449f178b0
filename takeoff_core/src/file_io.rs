//! # File I/O Module
//!
//! Saves and loads building documents:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility
//! - **Legacy files**: Bare building JSON without the envelope still loads
//!
//! ## File Format
//!
//! Buildings are saved as `.mbt` files containing JSON:
//!
//! ```json
//! {
//!   "meta": { "version": "0.1.0", "name": "Shop", "created": "...", "modified": "..." },
//!   "building": { "length": 40, "width": 40, "height": 12, "roofPitch": 3, "bays": 2 }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::building::BuildingDocument;
//! use takeoff_core::file_io::{load_building, save_building, BuildingFile};
//! use std::path::Path;
//!
//! let file = BuildingFile::new(BuildingDocument::new(40.0, 40.0, 12.0, 2));
//! save_building(&file, Path::new("shop.mbt")).unwrap();
//!
//! let loaded = load_building(Path::new("shop.mbt")).unwrap();
//! assert_eq!(loaded.building.bays, 2);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::building::BuildingDocument;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for building files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default building file extension
pub const FILE_EXTENSION: &str = "mbt";

/// File envelope metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingMeta {
    /// Schema version the file was written with
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl BuildingMeta {
    fn now() -> Self {
        let now = Utc::now();
        BuildingMeta {
            version: SCHEMA_VERSION.to_string(),
            name: None,
            created: now,
            modified: now,
        }
    }
}

/// A saved building: metadata plus the document itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFile {
    pub meta: BuildingMeta,
    pub building: BuildingDocument,
}

impl BuildingFile {
    pub fn new(building: BuildingDocument) -> Self {
        BuildingFile {
            meta: BuildingMeta::now(),
            building,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Save a building file with atomic write semantics.
///
/// The save process:
/// 1. Serialize to JSON
/// 2. Write to a temporary file (.mbt.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
pub fn save_building(file: &BuildingFile, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(file)?;

    let tmp_path = path.with_extension(format!("{}.tmp", FILE_EXTENSION));

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), bytes = json.len(), "Saved building");
    Ok(())
}

/// Load a building file.
///
/// # Returns
///
/// * `Ok(BuildingFile)` - Successfully loaded
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_building(path: &Path) -> CalcResult<BuildingFile> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let loaded = parse_building(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), reason),
        },
        other => other,
    })?;

    info!(path = %path.display(), version = %loaded.meta.version, "Loaded building");
    Ok(loaded)
}

/// Parse building file JSON, with or without the envelope.
pub fn parse_building(json: &str) -> CalcResult<BuildingFile> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    if value.get("building").is_some() {
        let file: BuildingFile = serde_json::from_value(value)?;
        validate_version(&file.meta.version)?;
        return Ok(file);
    }

    if value.get("length").is_some() {
        debug!("Building JSON has no envelope, reading it as a bare document");
        let building: BuildingDocument = serde_json::from_value(value)?;
        return Ok(BuildingFile::new(building));
    }

    Err(CalcError::missing_field("building"))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::RollUpDoor;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_building_path(name: &str) -> PathBuf {
        temp_dir().join(format!("takeoff_test_{}.mbt", name))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_building_path("roundtrip");

        let mut doc = BuildingDocument::new(40.0, 40.0, 12.0, 2).with_pitch(3.0);
        doc.roll_up_doors.push(RollUpDoor::new(16.0, 10.0).at(12.0));
        let file = BuildingFile::new(doc).with_name("Shop");
        save_building(&file, &path).unwrap();

        let loaded = load_building(&path).unwrap();
        assert_eq!(loaded, file);
        assert_eq!(loaded.meta.name.as_deref(), Some("Shop"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_building_path("atomic");
        let tmp_path = path.with_extension("mbt.tmp");

        let file = BuildingFile::new(BuildingDocument::new(30.0, 20.0, 10.0, 1));
        save_building(&file, &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_bare_document() {
        let json = r#"{ "length": 40, "width": 40, "height": 12, "pitch": 3, "bays": 2 }"#;
        let file = parse_building(json).unwrap();
        assert_eq!(file.meta.version, SCHEMA_VERSION);
        assert_eq!(file.building.roof_pitch, Some(3.0));
    }

    #[test]
    fn test_load_rejects_unrelated_json() {
        let err = parse_building(r#"{ "name": "not a building" }"#).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");

        let err = parse_building("not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_building(&temp_building_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_newer_file_is_rejected() {
        let mut file = BuildingFile::new(BuildingDocument::new(40.0, 40.0, 12.0, 2));
        file.meta.version = "0.9.0".to_string();
        let json = serde_json::to_string(&file).unwrap();
        let err = parse_building(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_touch_updates_modified() {
        let mut file = BuildingFile::new(BuildingDocument::new(40.0, 40.0, 12.0, 2));
        let created = file.meta.created;
        file.touch();
        assert!(file.meta.modified >= created);
        assert_eq!(file.meta.created, created);
    }
}
