//! Reading queries from files and directories

use std::path::{Path, PathBuf};

use sqlvet_core::{Config, InputRules, QueryRecord, SplitMode};
use walkdir::WalkDir;

/// Errors that can occur when reading input
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// How input is turned into queries
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    pub split: SplitMode,
    pub input: InputRules,
}

impl ReaderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            split: config.split,
            input: config.input.clone(),
        }
    }
}

/// Read queries from a file, or from every file directly inside a directory
///
/// Directory entries are visited in file-name order and are not recursed.
pub fn read_input(path: &Path, options: &ReaderOptions) -> Result<Vec<QueryRecord>, ReadError> {
    if path.is_file() {
        return read_file(path, options.split);
    }

    if !path.is_dir() {
        return Err(ReadError::InvalidPath(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if options.input.is_file_skipped(&file_name) {
            tracing::debug!(file = %file_name, "skipping file");
            continue;
        }

        records.extend(read_file(entry.path(), options.split)?);
    }

    Ok(records)
}

/// Read the queries of one file; the label is the file name
pub fn read_file(path: &Path, split: SplitMode) -> Result<Vec<QueryRecord>, ReadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let records: Vec<QueryRecord> = split_queries(&content, split)
        .into_iter()
        .map(|sql| QueryRecord::new(label.clone(), sql))
        .collect();

    tracing::debug!(file = %path.display(), queries = records.len(), "read input file");
    Ok(records)
}

/// Cut file content into trimmed, non-empty queries
///
/// In line mode a trailing `;` is dropped from each line.
pub fn split_queries(content: &str, split: SplitMode) -> Vec<&str> {
    match split {
        SplitMode::Statement => content
            .split(';')
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .collect(),
        SplitMode::Line => content
            .lines()
            .map(|line| line.trim().trim_end_matches(';').trim_end())
            .filter(|query| !query.is_empty())
            .collect(),
    }
}
