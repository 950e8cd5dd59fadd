//! Single-file JSON persistence for `AppData`.
//!
//! Read failures fall back to the default state (logged, not surfaced);
//! write failures propagate so the caller can show a blocking notice.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::AppData;

/// State blob file name in the data directory.
const DATA_FILE: &str = "data.json";

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid file format: missing \"assessments\" array")]
    MissingAssessments,
    #[error("failed to persist imported data: {0}")]
    Persist(anyhow::Error),
}

pub struct DataStore {
    data_dir: PathBuf,
}

impl DataStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    fn data_path(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE)
    }

    /// Load the state blob, falling back to defaults if the file is
    /// missing or corrupt.
    pub fn load(&self) -> AppData {
        let path = self.data_path();
        if !path.exists() {
            debug!(?path, "No data file, starting with defaults");
            return AppData::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(e) => {
                    warn!(error = %e, ?path, "Corrupt data file, starting with defaults");
                    AppData::default()
                }
            },
            Err(e) => {
                warn!(error = %e, ?path, "Failed to read data file, starting with defaults");
                AppData::default()
            }
        }
    }

    /// Write the whole state blob through to disk.
    pub fn save(&self, data: &AppData) -> Result<()> {
        let path = self.data_path();
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write data file {}", path.display()))?;
        Ok(())
    }

    /// Default export file name: `amor-fati-export-YYYY-MM-DD.json`.
    pub fn default_export_name() -> String {
        format!("amor-fati-export-{}.json", Utc::now().format("%Y-%m-%d"))
    }

    /// Export the state blob to a user-chosen file.
    pub fn export(&self, data: &AppData, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write export file {}", path.display()))?;
        Ok(())
    }

    /// Parse and validate an import file without touching current state.
    ///
    /// The top-level shape must contain a sequence under "assessments";
    /// anything else is rejected and the caller keeps its state unchanged.
    pub fn parse_import(path: &Path) -> Result<AppData, ImportError> {
        let contents = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;

        let valid = value
            .get("assessments")
            .map(serde_json::Value::is_array)
            .unwrap_or(false);
        if !valid {
            return Err(ImportError::MissingAssessments);
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Import a file, replacing in-memory and durable state wholesale.
    /// A failed durable write is an error; the import did not happen.
    pub fn import(&self, path: &Path) -> Result<AppData, ImportError> {
        let data = Self::parse_import(path)?;
        self.save(&data).map_err(ImportError::Persist)?;
        Ok(data)
    }
}
