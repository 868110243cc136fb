//! SQL dialect policies
//!
//! A dialect is a read-only bundle of policy constants plus hooks that add
//! diagnostics on top of the generic grammar checks. New dialects implement
//! [`Dialect`] and are listed in [`DIALECTS`]; the validator only ever sees
//! `&dyn Dialect`.

mod ansi;
mod mysql;

pub use ansi::AnsiDialect;
pub use mysql::MySqlDialect;

use sqlvet_core::Diagnostic;
use crate::statement::{Statement, StatementKind};
use crate::tokenizer::Token;

/// The seven statement kinds every built-in dialect accepts
pub const STANDARD_STATEMENTS: &[StatementKind] = &[
    StatementKind::Select,
    StatementKind::Insert,
    StatementKind::Update,
    StatementKind::Delete,
    StatementKind::Create,
    StatementKind::Drop,
    StatementKind::Alter,
];

/// Dialect-specific policy and validation hooks
pub trait Dialect: Send + Sync {
    /// Registry name, e.g. `"ansi"`
    fn name(&self) -> &'static str;

    /// Statement kinds this dialect accepts
    fn allowed_statements(&self) -> &[StatementKind];

    /// Deepest allowed subquery nesting (at least 1)
    fn max_subquery_depth(&self) -> usize;

    /// Keywords that must not appear anywhere in a query
    fn forbidden_keywords(&self) -> &[&'static str];

    /// Check the statement itself
    fn validate_statement(&self, _stmt: &Statement<'_>, _tokens: &[Token]) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check clause usage
    fn validate_clauses(&self, _stmt: &Statement<'_>, _tokens: &[Token]) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check DDL specifics
    fn validate_ddl(&self, _stmt: &Statement<'_>, _tokens: &[Token]) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Built-in dialects by name. Fixed at compile time, shared read-only.
pub static DIALECTS: &[(&str, &dyn Dialect)] = &[
    ("ansi", &AnsiDialect),
    ("mysql", &MySqlDialect),
];

/// Unknown dialect requested
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialectError {
    #[error("Unknown dialect '{name}'. Available dialects: {available}")]
    Unknown { name: String, available: String },
}

/// Look up a dialect by name (case-insensitive)
pub fn resolve_dialect(name: &str) -> Result<&'static dyn Dialect, DialectError> {
    let wanted = name.trim().to_ascii_lowercase();

    DIALECTS
        .iter()
        .find(|(key, _)| *key == wanted)
        .map(|(_, dialect)| *dialect)
        .ok_or_else(|| DialectError::Unknown {
            name: name.to_string(),
            available: dialect_names().join(", "),
        })
}

/// Names of all registered dialects
pub fn dialect_names() -> Vec<&'static str> {
    DIALECTS.iter().map(|(name, _)| *name).collect()
}
