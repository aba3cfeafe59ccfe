//! Catalogue persistence - a single JSON file holding the ranked catalogue.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::Catalogue;

/// Errors raised by catalogue persistence.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("catalogue file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalogue JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalogue contains a weight outside [0, 1)")]
    InvalidWeight,
}

/// Loads and saves the catalogue at a fixed path.
///
/// The store assumes a single engine owns the file at a time.
#[derive(Debug, Clone)]
pub struct CatalogueStore {
    path: PathBuf,
}

impl CatalogueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted catalogue. `Ok(None)` means no file exists yet.
    pub fn try_load(&self) -> Result<Option<Catalogue>, CatalogueError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let catalogue: Catalogue = serde_json::from_str(&raw)?;
        if !catalogue.has_valid_weights() {
            return Err(CatalogueError::InvalidWeight);
        }
        Ok(Some(catalogue))
    }

    /// Load the catalogue, substituting the built-in defaults when the file
    /// is missing or cannot be parsed. Never fails.
    pub fn load(&self) -> Catalogue {
        match self.try_load() {
            Ok(Some(catalogue)) => {
                debug!(
                    path = %self.path.display(),
                    categories = catalogue.len(),
                    entries = catalogue.entry_count(),
                    "loaded catalogue"
                );
                catalogue
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "no persisted catalogue, using defaults");
                Catalogue::defaults()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unusable catalogue file, using defaults");
                Catalogue::defaults()
            }
        }
    }

    /// Persist the full catalogue, replacing the previous copy.
    ///
    /// Written to a sibling temp file first, then renamed over the target.
    pub fn save(&self, catalogue: &Catalogue) -> Result<(), CatalogueError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(catalogue)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Overwrite the persisted catalogue with the defaults and return them.
    pub fn reset(&self) -> Result<Catalogue, CatalogueError> {
        let catalogue = Catalogue::defaults();
        self.save(&catalogue)?;
        Ok(catalogue)
    }
}
