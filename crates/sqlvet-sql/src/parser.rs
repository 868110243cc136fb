//! Per-statement grammar checks
//!
//! Each validator looks up required keywords by first occurrence and checks
//! their relative positions. This is a linear scan, not a full parser, and
//! every diagnostic is reported on line 1.

use sqlvet_core::Diagnostic;
use crate::statement::{classify, StatementKind};
use crate::tokenizer::Token;

/// Validate the grammar of a tokenized query
pub fn parse(sql: &str, tokens: &[Token]) -> Vec<Diagnostic> {
    let Some(statement) = classify(tokens) else {
        return vec![Diagnostic::grammar("Empty query", "No SQL statement found")];
    };

    tracing::trace!(statement = %statement.kind, sql, "checking grammar");

    let clauses = Clauses::new(tokens);
    match statement.kind {
        StatementKind::Select => validate_select(&clauses),
        StatementKind::Insert => validate_insert(&clauses),
        StatementKind::Update => validate_update(&clauses),
        StatementKind::Delete => validate_delete(&clauses),
        kind if kind.is_ddl() => validate_ddl(kind, &clauses),
        _ => vec![Diagnostic::grammar(
            "Unsupported SQL",
            format!("Statement type '{}' is not yet supported", statement.keyword),
        )],
    }
}

/// Keyword lookups over a token sequence
pub(crate) struct Clauses<'a> {
    tokens: &'a [Token],
}

impl<'a> Clauses<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Self { tokens }
    }

    /// Index of the first token with this text
    pub(crate) fn find(&self, text: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t.is(text))
    }

    /// Whether any token follows `idx`
    pub(crate) fn has_after(&self, idx: usize) -> bool {
        idx + 1 < self.tokens.len()
    }

    /// Whether the token at `idx` exists and has this text
    pub(crate) fn is_at(&self, idx: usize, text: &str) -> bool {
        self.tokens.get(idx).is_some_and(|t| t.is(text))
    }

    /// Index of the `)` closing the `(` at `open`
    pub(crate) fn closing_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(idx);
                }
            }
        }
        None
    }
}

fn validate_select(clauses: &Clauses<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    match clauses.find("FROM") {
        None => diagnostics.push(Diagnostic::grammar(
            "Missing FROM clause",
            "SELECT must contain FROM",
        )),
        Some(from_idx) => {
            if from_idx <= 1 {
                diagnostics.push(Diagnostic::grammar(
                    "Empty SELECT list",
                    "SELECT must specify columns or * before FROM",
                ));
            }
            if !clauses.has_after(from_idx) {
                diagnostics.push(Diagnostic::grammar(
                    "Missing table",
                    "FROM must be followed by a table or subquery",
                ));
            }
        }
    }

    check_where(clauses, &mut diagnostics);

    let group_idx = clauses.find("GROUP");
    if let Some(group_idx) = group_idx {
        if !clauses.is_at(group_idx + 1, "BY") {
            diagnostics.push(Diagnostic::grammar(
                "Invalid GROUP BY",
                "GROUP must be followed by BY",
            ));
        } else if !clauses.has_after(group_idx + 1) {
            diagnostics.push(Diagnostic::grammar(
                "Empty GROUP BY",
                "GROUP BY must specify columns",
            ));
        }
    }

    if let Some(having_idx) = clauses.find("HAVING") {
        match group_idx {
            Some(group_idx) if group_idx < having_idx => {
                if !clauses.has_after(having_idx) {
                    diagnostics.push(Diagnostic::grammar(
                        "Empty HAVING clause",
                        "HAVING must be followed by a condition",
                    ));
                }
            }
            _ => diagnostics.push(Diagnostic::grammar(
                "Invalid HAVING",
                "HAVING requires GROUP BY",
            )),
        }
    }

    if let Some(order_idx) = clauses.find("ORDER") {
        if !clauses.is_at(order_idx + 1, "BY") || !clauses.has_after(order_idx + 1) {
            diagnostics.push(Diagnostic::grammar(
                "Invalid ORDER BY",
                "ORDER must be followed by BY and at least one column",
            ));
        }
    }

    if let Some(limit_idx) = clauses.find("LIMIT") {
        if !clauses.has_after(limit_idx) {
            diagnostics.push(Diagnostic::grammar(
                "Empty LIMIT clause",
                "LIMIT must be followed by a number",
            ));
        }
    }

    diagnostics
}

fn validate_insert(clauses: &Clauses<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let into_idx = clauses.find("INTO");
    let values_idx = clauses.find("VALUES").or_else(|| clauses.find("VALUE"));

    let (Some(into_idx), Some(values_idx)) = (into_idx, values_idx) else {
        diagnostics.push(Diagnostic::grammar(
            "Invalid INSERT",
            "INSERT must use INTO and VALUES/VALUE",
        ));
        return diagnostics;
    };

    if into_idx > values_idx {
        diagnostics.push(Diagnostic::grammar(
            "Invalid INSERT order",
            "INTO must come before VALUES",
        ));
    }

    if !clauses.has_after(into_idx) {
        diagnostics.push(Diagnostic::grammar(
            "Missing table",
            "INTO must be followed by a table name",
        ));
    }

    // Optional column list right after the table name
    if clauses.is_at(into_idx + 2, "(") && clauses.closing_paren(into_idx + 2).is_none() {
        diagnostics.push(Diagnostic::grammar(
            "Unclosed parentheses",
            "Column list must be properly enclosed",
        ));
    }

    if !clauses.is_at(values_idx + 1, "(") {
        diagnostics.push(Diagnostic::grammar(
            "Invalid VALUES",
            "VALUES must be followed by (...)",
        ));
    }

    diagnostics
}

fn validate_update(clauses: &Clauses<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let Some(set_idx) = clauses.find("SET") else {
        diagnostics.push(Diagnostic::grammar(
            "Missing SET clause",
            "UPDATE must contain SET",
        ));
        return diagnostics;
    };

    if set_idx <= 1 {
        diagnostics.push(Diagnostic::grammar(
            "Missing table",
            "UPDATE must specify a table before SET",
        ));
    } else if !clauses.has_after(set_idx) {
        diagnostics.push(Diagnostic::grammar(
            "Empty SET clause",
            "SET must be followed by column assignments",
        ));
    }

    check_where(clauses, &mut diagnostics);
    diagnostics
}

fn validate_delete(clauses: &Clauses<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let Some(from_idx) = clauses.find("FROM") else {
        diagnostics.push(Diagnostic::grammar(
            "Missing FROM clause",
            "DELETE must use FROM",
        ));
        return diagnostics;
    };

    if !clauses.has_after(from_idx) {
        diagnostics.push(Diagnostic::grammar(
            "Missing table",
            "FROM must be followed by a table name",
        ));
    }

    check_where(clauses, &mut diagnostics);
    diagnostics
}

fn validate_ddl(kind: StatementKind, clauses: &Clauses<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let Some(table_idx) = clauses.find("TABLE") else {
        diagnostics.push(Diagnostic::grammar("Invalid DDL", "DDL must specify TABLE"));
        return diagnostics;
    };

    if !clauses.has_after(table_idx) {
        diagnostics.push(Diagnostic::grammar(
            "Missing table name",
            "TABLE must be followed by an identifier",
        ));
    }

    let definition_idx = table_idx + 2;
    if kind == StatementKind::Create && clauses.is_at(definition_idx, "(") {
        match clauses.closing_paren(definition_idx) {
            None => diagnostics.push(Diagnostic::grammar(
                "Unclosed table definition",
                "CREATE TABLE must have properly closed column definitions",
            )),
            Some(close_idx) if close_idx == definition_idx + 1 => {
                diagnostics.push(Diagnostic::grammar(
                    "Empty table definition",
                    "CREATE TABLE must define at least one column",
                ))
            }
            Some(_) => {}
        }
    }

    diagnostics
}

fn check_where(clauses: &Clauses<'_>, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(where_idx) = clauses.find("WHERE") {
        if !clauses.has_after(where_idx) {
            diagnostics.push(Diagnostic::grammar(
                "Empty WHERE clause",
                "WHERE must be followed by a condition",
            ));
        }
    }
}
