// SPDX-License-Identifier: MIT
// Copyright 2026 Medsched Contributors

//! Static data file server over a fixed base directory.
//!
//! Caller-supplied selectors are validated against a closed vocabulary
//! before any path is composed, so identifiers can never escape the base
//! directory.

use crate::error::AppError;
use std::fs;
use std::path::PathBuf;

/// Grades with published data files (dönem 1-6 of the medical program).
const ALLOWED_GRADES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

/// Published per-term file types.
const ALLOWED_TYPES: [&str; 3] = ["schedule", "courses", "cafeteria"];

/// A parsed data file plus the logical path it was resolved from.
#[derive(Debug, Clone)]
pub struct DataFile {
    pub value: serde_json::Value,
    /// Path relative to the data directory, e.g. `donem-1/schedule.json`.
    pub logical_path: String,
}

/// Read-only JSON file server rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct DataFileService {
    base_dir: PathBuf,
}

impl DataFileService {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Load the data file for a (grade, type) selector pair.
    pub fn load(&self, grade: &str, file_type: &str) -> Result<DataFile, DataFileError> {
        if !ALLOWED_GRADES.contains(&grade) {
            return Err(DataFileError::InvalidSelector(format!(
                "grade must be one of 1-6, got '{}'",
                grade
            )));
        }
        if !ALLOWED_TYPES.contains(&file_type) {
            return Err(DataFileError::InvalidSelector(format!(
                "type must be one of schedule|courses|cafeteria, got '{}'",
                file_type
            )));
        }

        self.read(format!("donem-{}/{}.json", grade, file_type))
    }

    /// Load a fixed, non-parameterized file such as `anatomi.json`.
    pub fn load_fixed(&self, name: &str) -> Result<DataFile, DataFileError> {
        self.read(name.to_string())
    }

    fn read(&self, logical_path: String) -> Result<DataFile, DataFileError> {
        let path = self.base_dir.join(&logical_path);

        if !path.is_file() {
            return Err(DataFileError::NotFound(logical_path));
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| DataFileError::Io(logical_path.clone(), e.to_string()))?;

        let value = serde_json::from_str(&raw)
            .map_err(|e| DataFileError::Parse(logical_path.clone(), e.to_string()))?;

        Ok(DataFile {
            value,
            logical_path,
        })
    }
}

/// Errors from data file access.
#[derive(Debug, thiserror::Error)]
pub enum DataFileError {
    #[error("Invalid data file selector: {0}")]
    InvalidSelector(String),

    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("Failed to read {0}: {1}")]
    Io(String, String),

    #[error("Malformed data file {0}: {1}")]
    Parse(String, String),
}

impl From<DataFileError> for AppError {
    fn from(err: DataFileError) -> Self {
        match err {
            DataFileError::InvalidSelector(msg) => AppError::BadRequest(msg),
            DataFileError::NotFound(path) => {
                AppError::NotFound(format!("Data file not found: {}", path))
            }
            other => AppError::Internal(anyhow::anyhow!(other)),
        }
    }
}
