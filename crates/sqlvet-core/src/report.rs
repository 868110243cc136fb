//! Per-query results and run summary (stable v1)
//!
//! The JSON field names of `ValidationResult` are the report format.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::Diagnostic;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// One query handed to the validator by the ingestion side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Where the query came from (file name)
    pub source_label: String,

    /// Raw SQL text
    pub sql_text: String,
}

impl QueryRecord {
    pub fn new(source_label: impl Into<String>, sql_text: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            sql_text: sql_text.into(),
        }
    }
}

/// Outcome of validating one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation result for one query (query_<id>.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// 1-based position of the query in the run
    #[serde(rename = "q_id")]
    pub query_id: usize,

    #[serde(rename = "source")]
    pub source_label: String,

    #[serde(rename = "sql")]
    pub sql_text: String,

    pub status: Status,

    /// Diagnostics in detection order
    #[serde(rename = "errors")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Build a result; the status is derived from the diagnostics so it can
    /// never disagree with them.
    pub fn new(query_id: usize, record: QueryRecord, diagnostics: Vec<Diagnostic>) -> Self {
        let status = if diagnostics.is_empty() {
            Status::Success
        } else {
            Status::Failed
        };

        Self {
            query_id,
            source_label: record.source_label,
            sql_text: record.sql_text,
            status,
            diagnostics,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run-level totals. Informational only - per-query status is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Dialect the run was validated against
    pub dialect: String,

    pub processed: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Create an empty summary for a run
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            dialect: dialect.into(),
            processed: 0,
            passed: 0,
            failed: 0,
        }
    }

    /// Count one query result
    pub fn record(&mut self, result: &ValidationResult) {
        self.processed += 1;
        if result.is_success() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Check if any query failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
