//! Generic ANSI SQL

use sqlvet_core::Diagnostic;
use super::{Dialect, STANDARD_STATEMENTS};
use crate::statement::{Statement, StatementKind};
use crate::tokenizer::Token;

/// Strict ANSI SQL: vendor extensions are reported
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn allowed_statements(&self) -> &[StatementKind] {
        STANDARD_STATEMENTS
    }

    fn max_subquery_depth(&self) -> usize {
        2
    }

    fn forbidden_keywords(&self) -> &[&'static str] {
        &["LIMIT", "TOP", "ILIKE"]
    }

    fn validate_statement(&self, stmt: &Statement<'_>, _tokens: &[Token]) -> Vec<Diagnostic> {
        if self.allowed_statements().contains(&stmt.kind) {
            return Vec::new();
        }

        vec![Diagnostic::dialect(
            "Invalid statement",
            format!("{} is not allowed in ANSI SQL", stmt.keyword),
        )]
    }

    /// One diagnostic per forbidden keyword occurrence
    fn validate_clauses(&self, _stmt: &Statement<'_>, tokens: &[Token]) -> Vec<Diagnostic> {
        let forbidden = self.forbidden_keywords();

        tokens
            .iter()
            .filter(|token| forbidden.iter().any(|keyword| *keyword == token.text))
            .map(|token| {
                Diagnostic::dialect(
                    "Non-ANSI feature",
                    format!("{} is not supported in ANSI SQL", token.text),
                )
            })
            .collect()
    }
}
