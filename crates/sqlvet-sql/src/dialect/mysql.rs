//! MySQL

use sqlvet_core::Diagnostic;
use super::{Dialect, STANDARD_STATEMENTS};
use crate::statement::{Statement, StatementKind};
use crate::tokenizer::Token;

/// MySQL: LIMIT is allowed but needs an argument
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn allowed_statements(&self) -> &[StatementKind] {
        STANDARD_STATEMENTS
    }

    fn max_subquery_depth(&self) -> usize {
        4
    }

    fn forbidden_keywords(&self) -> &[&'static str] {
        &[]
    }

    fn validate_clauses(&self, _stmt: &Statement<'_>, tokens: &[Token]) -> Vec<Diagnostic> {
        match tokens.iter().position(|t| t.is("LIMIT")) {
            Some(idx) if idx + 1 == tokens.len() => vec![Diagnostic::dialect(
                "Invalid LIMIT",
                "LIMIT must be followed by a number",
            )],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::classify;
    use crate::tokenizer::tokenize;

    fn clauses(sql: &str) -> Vec<Diagnostic> {
        let tokens = tokenize(sql).unwrap();
        let stmt = classify(&tokens).unwrap();
        MySqlDialect.validate_clauses(&stmt, &tokens)
    }

    #[test]
    fn limit_with_number_is_allowed() {
        assert!(clauses("SELECT * FROM users LIMIT 5").is_empty());
    }

    #[test]
    fn trailing_limit_is_invalid() {
        let diagnostics = clauses("SELECT * FROM users LIMIT");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].issue, "Invalid LIMIT");
    }

    #[test]
    fn policy_constants() {
        assert_eq!(MySqlDialect.max_subquery_depth(), 4);
        assert!(MySqlDialect.forbidden_keywords().is_empty());
        assert_eq!(MySqlDialect.allowed_statements().len(), 7);
    }

    #[test]
    fn statement_and_ddl_hooks_are_permissive() {
        let tokens = tokenize("TRUNCATE users").unwrap();
        let stmt = classify(&tokens).unwrap();

        assert!(MySqlDialect.validate_statement(&stmt, &tokens).is_empty());
        assert!(MySqlDialect.validate_ddl(&stmt, &tokens).is_empty());
    }
}
