//! Handoff contract - the one-shot record the scan workflow leaves for the advisor.
//!
//! The upstream stage writes a JSON object:
//!
//! ```json
//! { "schema_version": 1, "crop": "Tomato", "disease": "Early Blight", "status": "DEFECTIVE" }
//! ```
//!
//! `schema_version` may be omitted, in which case version 1 is assumed. The
//! advisor reads the record once at start-up; a missing or unreadable record
//! degrades to [`SessionContext::default`] instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::{SessionContext, UNKNOWN_FIELD};

/// The only handoff schema this crate understands.
pub const HANDOFF_SCHEMA_VERSION: u32 = 1;

fn current_schema_version() -> u32 {
    HANDOFF_SCHEMA_VERSION
}

/// Errors raised while reading or writing a handoff record.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("handoff file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("handoff file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("handoff record must be a JSON object")]
    NotAnObject,

    #[error("unsupported handoff schema version {found} (supported: {supported})")]
    UnsupportedSchema { found: String, supported: u32 },
}

/// The serialized form of a handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffRecord {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    pub crop: String,
    pub disease: String,
    pub status: String,
}

impl HandoffRecord {
    /// Create a record stamped with the current schema version.
    pub fn new(
        crop: impl Into<String>,
        disease: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: HANDOFF_SCHEMA_VERSION,
            crop: crop.into(),
            disease: disease.into(),
            status: status.into(),
        }
    }

    /// Build a record from loosely-typed JSON.
    ///
    /// Field values are coerced to strings: strings are taken verbatim,
    /// `null` or a missing key becomes `"Unknown"`, anything else becomes its
    /// compact JSON text.
    pub fn from_value(value: &Value) -> Result<Self, HandoffError> {
        let object = value.as_object().ok_or(HandoffError::NotAnObject)?;

        let schema_version = match object.get("schema_version") {
            None | Some(Value::Null) => HANDOFF_SCHEMA_VERSION,
            Some(raw) => match raw.as_u64() {
                Some(v) if v == u64::from(HANDOFF_SCHEMA_VERSION) => HANDOFF_SCHEMA_VERSION,
                _ => {
                    return Err(HandoffError::UnsupportedSchema {
                        found: raw.to_string(),
                        supported: HANDOFF_SCHEMA_VERSION,
                    })
                }
            },
        };

        let field = |key: &str| coerce_to_string(object.get(key));

        Ok(Self {
            schema_version,
            crop: field("crop"),
            disease: field("disease"),
            status: field("status"),
        })
    }

    /// Convert into the session context the engine consumes.
    pub fn into_session(self) -> SessionContext {
        SessionContext::new(self.crop, self.disease, self.status)
    }
}

impl From<&SessionContext> for HandoffRecord {
    fn from(context: &SessionContext) -> Self {
        Self::new(&context.crop, &context.condition, &context.status)
    }
}

fn coerce_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_FIELD.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A handoff record stored at a fixed path.
#[derive(Debug, Clone)]
pub struct HandoffFile {
    path: PathBuf,
}

impl HandoffFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. Returns `Ok(None)` when no file exists.
    pub fn read(&self) -> Result<Option<HandoffRecord>, HandoffError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value: Value = serde_json::from_str(&raw)?;
        HandoffRecord::from_value(&value).map(Some)
    }

    /// Load the session context, falling back to the default on any failure.
    pub fn load_session(&self) -> SessionContext {
        match self.read() {
            Ok(Some(record)) => {
                debug!(path = %self.path.display(), crop = %record.crop, "loaded handoff record");
                record.into_session()
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "no handoff record, using default context");
                SessionContext::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable handoff record, using default context");
                SessionContext::default()
            }
        }
    }

    /// Write a record, replacing any previous one.
    pub fn write(&self, record: &HandoffRecord) -> Result<(), HandoffError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handoff_in(dir: &tempfile::TempDir) -> HandoffFile {
        HandoffFile::new(dir.path().join("current_session.json"))
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = handoff_in(&dir);

        assert!(file.read().unwrap().is_none());
        assert_eq!(file.load_session(), SessionContext::default());
    }

    #[test]
    fn test_write_then_load_session() {
        let dir = tempfile::tempdir().unwrap();
        let file = handoff_in(&dir);

        file.write(&HandoffRecord::new("Tomato", "Early Blight", "DEFECTIVE"))
            .unwrap();

        let context = file.load_session();
        assert_eq!(context.crop, "Tomato");
        assert_eq!(context.condition, "Early Blight");
        assert_eq!(context.status, "DEFECTIVE");
    }

    #[test]
    fn test_legacy_record_without_version() {
        let value = json!({ "crop": "Rice", "disease": "Blast", "status": "DEFECTIVE" });
        let record = HandoffRecord::from_value(&value).unwrap();
        assert_eq!(record.schema_version, HANDOFF_SCHEMA_VERSION);
        assert_eq!(record.disease, "Blast");
    }

    #[test]
    fn test_field_coercion() {
        let value = json!({ "crop": 42, "disease": null, "status": true });
        let record = HandoffRecord::from_value(&value).unwrap();
        assert_eq!(record.crop, "42");
        assert_eq!(record.disease, "Unknown");
        assert_eq!(record.status, "true");
    }

    #[test]
    fn test_missing_fields_become_unknown() {
        let record = HandoffRecord::from_value(&json!({ "crop": "Wheat" })).unwrap();
        assert_eq!(record.crop, "Wheat");
        assert_eq!(record.disease, "Unknown");
        assert_eq!(record.status, "Unknown");
    }

    #[test]
    fn test_unsupported_schema_rejected() {
        let value = json!({ "schema_version": 2, "crop": "Rice", "disease": "Blast", "status": "x" });
        let err = HandoffRecord::from_value(&value).unwrap_err();
        assert!(matches!(err, HandoffError::UnsupportedSchema { .. }));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = HandoffRecord::from_value(&json!(["Tomato"])).unwrap_err();
        assert!(matches!(err, HandoffError::NotAnObject));
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = handoff_in(&dir);
        fs::write(file.path(), "{ not json").unwrap();

        assert!(matches!(file.read(), Err(HandoffError::Parse(_))));
        assert_eq!(file.load_session(), SessionContext::default());
    }

    #[test]
    fn test_record_from_session() {
        let context = SessionContext::new("Maize", "Rust", "DEFECTIVE");
        let record = HandoffRecord::from(&context);
        assert_eq!(record.into_session(), context);
    }
}
