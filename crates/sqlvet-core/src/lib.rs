//! sqlvet core
//!
//! Shared domain model: diagnostics, per-query results, run summary and
//! configuration. The report field names are part of the public format.

pub mod diagnostic;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCategory};
pub use report::{QueryRecord, ReportVersion, RunSummary, Status, ValidationResult};
pub use config::{Config, ConfigError, InputRules, SplitMode};
