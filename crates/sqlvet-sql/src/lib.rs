//! SQL validation stages
//!
//! This crate handles:
//! - Tokenizing query text into typed tokens with line numbers
//! - Structural rules over the raw text (balance, string closure, nesting)
//! - Statement classification and per-statement grammar checks
//! - Dialect policies (ANSI, MySQL) behind the `Dialect` trait
//! - Optional subquery, CTE and set-operation checks

pub mod tokenizer;
pub mod rules;
pub mod statement;
pub mod parser;
pub mod dialect;
pub mod subquery;

pub use tokenizer::{tokenize, LexError, Token, TokenKind};
pub use rules::{apply_rules, subquery_depth};
pub use statement::{classify, get_statement_type, Statement, StatementKind};
pub use parser::parse;
pub use dialect::{resolve_dialect, dialect_names, AnsiDialect, Dialect, DialectError, MySqlDialect, DIALECTS};
pub use subquery::{extended_checks, extract_subqueries, validate_cte, Subquery};
