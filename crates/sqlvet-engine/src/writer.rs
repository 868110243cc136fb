//! Persisting validation results

use std::path::{Path, PathBuf};

use sqlvet_core::ValidationResult;
use walkdir::WalkDir;

/// Errors that can occur when persisting a result
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to list output directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Receives one result per validated query
pub trait ReportSink {
    fn write(&mut self, result: &ValidationResult) -> Result<(), WriteError>;
}

/// Writes `query_<id>.json` documents into a directory
///
/// On the first write the directory is created and any `query_<id>.json`
/// left by an earlier run is removed. Other files are kept.
#[derive(Debug, Clone)]
pub struct JsonDirectoryWriter {
    output_dir: PathBuf,
    dir_ready: bool,
}

impl JsonDirectoryWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dir_ready: false,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the document for a query
    pub fn path_for(&self, query_id: usize) -> PathBuf {
        self.output_dir.join(format!("query_{}.json", query_id))
    }

    fn prepare_dir(&self) -> Result<(), WriteError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| WriteError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        for entry in WalkDir::new(&self.output_dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_result_file(&entry.file_name().to_string_lossy()) {
                continue;
            }

            std::fs::remove_file(entry.path()).map_err(|source| WriteError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %entry.path().display(), "removed stale result");
        }

        Ok(())
    }
}

/// `query_<digits>.json`
fn is_result_file(file_name: &str) -> bool {
    file_name
        .strip_prefix("query_")
        .and_then(|rest| rest.strip_suffix(".json"))
        .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

impl ReportSink for JsonDirectoryWriter {
    fn write(&mut self, result: &ValidationResult) -> Result<(), WriteError> {
        if !self.dir_ready {
            self.prepare_dir()?;
            self.dir_ready = true;
        }

        let path = self.path_for(result.query_id);
        let json = result.to_json()?;
        std::fs::write(&path, json).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "result written");
        Ok(())
    }
}

/// Keeps results in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub results: Vec<ValidationResult>,
}

impl ReportSink for MemorySink {
    fn write(&mut self, result: &ValidationResult) -> Result<(), WriteError> {
        self.results.push(result.clone());
        Ok(())
    }
}
