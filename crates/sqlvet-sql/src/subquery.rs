//! Subquery, CTE and set-operation checks
//!
//! Opt-in checks layered on top of the grammar validators. They only add
//! diagnostics and never change what the other stages report.

use sqlvet_core::Diagnostic;
use crate::statement::{Statement, StatementKind};
use crate::tokenizer::Token;

/// Subqueries nested deeper than this are reported
pub const MAX_RECOMMENDED_NESTING: usize = 4;

const SET_OPERATIONS: [&str; 3] = ["UNION", "INTERSECT", "EXCEPT"];

/// A parenthesized group whose content starts with SELECT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery<'a> {
    /// Byte offset of the opening paren
    pub start: usize,

    /// Byte offset of the closing paren
    pub end: usize,

    /// Trimmed text between the parens
    pub sql: &'a str,
}

impl Subquery<'_> {
    fn encloses(&self, other: &Subquery<'_>) -> bool {
        self.start < other.start && other.end < self.end
    }
}

/// Find every subquery at any depth, in closing-paren order
pub fn extract_subqueries(sql: &str) -> Vec<Subquery<'_>> {
    let mut subqueries = Vec::new();
    let mut open_parens: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut prev: Option<char> = None;

    for (idx, ch) in sql.char_indices() {
        if ch == '\'' && prev != Some('\\') {
            in_string = !in_string;
        } else if !in_string {
            if ch == '(' {
                open_parens.push(idx);
            } else if ch == ')' {
                if let Some(start) = open_parens.pop() {
                    let content = sql[start + 1..idx].trim();
                    if starts_with_select(content) {
                        subqueries.push(Subquery { start, end: idx, sql: content });
                    }
                }
            }
        }
        prev = Some(ch);
    }

    subqueries
}

/// Check subquery syntax and nesting
pub fn validate_subqueries(sql: &str) -> Vec<Diagnostic> {
    let subqueries = extract_subqueries(sql);
    let mut diagnostics = Vec::new();

    for subquery in &subqueries {
        if subquery.sql.matches('(').count() != subquery.sql.matches(')').count() {
            diagnostics.push(Diagnostic::grammar(
                "Unmatched parentheses in subquery",
                "Subquery has unbalanced parentheses",
            ));
        }
        if subquery.sql.matches('\'').count() % 2 != 0 {
            diagnostics.push(Diagnostic::grammar(
                "Unclosed string in subquery",
                "Subquery has unclosed string literal",
            ));
        }
    }

    let deepest = subqueries
        .iter()
        .map(|inner| 1 + subqueries.iter().filter(|outer| outer.encloses(inner)).count())
        .max()
        .unwrap_or(0);

    if deepest > MAX_RECOMMENDED_NESTING {
        diagnostics.push(Diagnostic::grammar(
            "Excessive subquery nesting",
            format!(
                "Nesting more than {} levels deep is not recommended",
                MAX_RECOMMENDED_NESTING
            ),
        ));
    }

    diagnostics
}

/// Check UNION / INTERSECT / EXCEPT usage in a SELECT
pub fn validate_set_operations(stmt: &Statement<'_>, tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if stmt.kind != StatementKind::Select {
        return diagnostics;
    }

    for op in SET_OPERATIONS {
        let positions: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is(op))
            .map(|(idx, _)| idx)
            .collect();

        if positions.len() > 1 {
            diagnostics.push(Diagnostic::grammar(
                format!("Multiple {}s", op),
                format!(
                    "Ensure {} syntax is correct. Found {} {} operations",
                    op,
                    positions.len(),
                    op
                ),
            ));
        }

        for pos in positions {
            if !operand_is_select(tokens, pos + 1) {
                diagnostics.push(Diagnostic::grammar(
                    format!("Invalid {}", op),
                    format!("Both sides of {} must be SELECT statements", op),
                ));
            }
        }
    }

    diagnostics
}

/// Check the shape of a leading `WITH name AS (...)`
///
/// Only the first CTE is inspected. Queries not starting with WITH pass.
pub fn validate_cte(stmt: &Statement<'_>, tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if stmt.keyword != "WITH" {
        return diagnostics;
    }

    let Some(as_idx) = tokens.iter().position(|t| t.is("AS")) else {
        diagnostics.push(Diagnostic::grammar(
            "Invalid CTE",
            "WITH clause must include AS (SELECT ...)",
        ));
        return diagnostics;
    };

    // Exactly one name token between WITH and AS
    let name = &tokens[1..as_idx];
    if name.len() != 1 || name[0].is("(") {
        diagnostics.push(Diagnostic::grammar(
            "Invalid CTE name",
            "CTE name must be a valid identifier between WITH and AS",
        ));
    }

    if !tokens.get(as_idx + 1).is_some_and(|t| t.is("(")) {
        diagnostics.push(Diagnostic::grammar(
            "Invalid CTE syntax",
            "AS must be followed by (SELECT ...)",
        ));
    }

    diagnostics
}

/// Run all opt-in checks
pub fn extended_checks(sql: &str, stmt: &Statement<'_>, tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = validate_subqueries(sql);
    diagnostics.extend(validate_cte(stmt, tokens));
    diagnostics.extend(validate_set_operations(stmt, tokens));
    diagnostics
}

fn operand_is_select(tokens: &[Token], mut idx: usize) -> bool {
    if tokens.get(idx).is_some_and(|t| t.is("ALL") || t.is("DISTINCT")) {
        idx += 1;
    }
    while tokens.get(idx).is_some_and(|t| t.is("(")) {
        idx += 1;
    }
    tokens.get(idx).is_some_and(|t| t.is("SELECT"))
}

fn starts_with_select(text: &str) -> bool {
    text.get(..6).is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::classify;
    use crate::tokenizer::tokenize;

    fn set_op_issues(sql: &str) -> Vec<String> {
        let tokens = tokenize(sql).unwrap();
        let stmt = classify(&tokens).unwrap();
        validate_set_operations(&stmt, &tokens)
            .into_iter()
            .map(|d| d.issue)
            .collect()
    }

    #[test]
    fn extract_nested_subqueries() {
        let sql = "SELECT * FROM a WHERE x IN (SELECT y FROM b WHERE z IN (select w FROM c)) AND (1 = 1)";
        let subqueries = extract_subqueries(sql);

        assert_eq!(subqueries.len(), 2);
        assert_eq!(subqueries[0].sql, "select w FROM c");
        assert_eq!(subqueries[1].sql, "SELECT y FROM b WHERE z IN (select w FROM c)");
        assert!(subqueries[1].encloses(&subqueries[0]));
    }

    #[test]
    fn parens_in_strings_are_skipped() {
        let subqueries = extract_subqueries("SELECT * FROM t WHERE a = '(SELECT 1)'");
        assert!(subqueries.is_empty());
    }

    #[test]
    fn well_formed_subqueries_pass() {
        let sql = "SELECT * FROM users WHERE id IN (SELECT uid FROM orders WHERE total > (SELECT AVG(total) FROM orders))";
        assert!(validate_subqueries(sql).is_empty());
    }

    #[test]
    fn unbalanced_subquery_content() {
        // The string hides one paren from the extractor but not from the count
        let diagnostics = validate_subqueries("SELECT * FROM t WHERE a IN (SELECT b FROM u WHERE c = '(')");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].issue, "Unmatched parentheses in subquery");
    }

    #[test]
    fn excessive_nesting() {
        let sql = "SELECT * FROM t1 WHERE a IN (SELECT a FROM t2 WHERE a IN (SELECT a FROM t3 WHERE a IN \
                   (SELECT a FROM t4 WHERE a IN (SELECT a FROM t5 WHERE a IN (SELECT a FROM t6)))))";
        let issues: Vec<String> = validate_subqueries(sql).into_iter().map(|d| d.issue).collect();
        assert_eq!(issues, vec!["Excessive subquery nesting"]);

        let four_deep = "SELECT * FROM t1 WHERE a IN (SELECT a FROM t2 WHERE a IN (SELECT a FROM t3 WHERE a IN \
                         (SELECT a FROM t4 WHERE a IN (SELECT a FROM t5))))";
        assert!(validate_subqueries(four_deep).is_empty());
    }

    #[test]
    fn set_operations() {
        assert!(set_op_issues("SELECT a FROM t UNION SELECT a FROM u").is_empty());
        assert!(set_op_issues("SELECT a FROM t UNION ALL SELECT a FROM u").is_empty());
        assert_eq!(set_op_issues("SELECT a FROM t EXCEPT a FROM u"), vec!["Invalid EXCEPT"]);
        assert_eq!(
            set_op_issues("SELECT a FROM t UNION SELECT a FROM u UNION SELECT a FROM v"),
            vec!["Multiple UNIONs"]
        );
        assert_eq!(set_op_issues("SELECT a FROM t INTERSECT"), vec!["Invalid INTERSECT"]);
    }

    fn cte_issues(sql: &str) -> Vec<String> {
        let tokens = tokenize(sql).unwrap();
        let stmt = classify(&tokens).unwrap();
        validate_cte(&stmt, &tokens).into_iter().map(|d| d.issue).collect()
    }

    #[test]
    fn well_formed_cte_passes() {
        assert!(cte_issues("WITH recent AS (SELECT id FROM orders) SELECT * FROM recent").is_empty());
        assert!(cte_issues("with last_orders as (select id from orders) select * from last_orders").is_empty());
    }

    #[test]
    fn cte_without_as() {
        assert_eq!(cte_issues("WITH x (SELECT 1) SELECT * FROM x"), vec!["Invalid CTE"]);
    }

    #[test]
    fn cte_name_must_be_one_identifier() {
        assert_eq!(cte_issues("WITH AS (SELECT 1) SELECT * FROM x"), vec!["Invalid CTE name"]);
        assert_eq!(cte_issues("WITH a b AS (SELECT 1) SELECT * FROM a"), vec!["Invalid CTE name"]);
        assert_eq!(cte_issues("WITH ( AS (SELECT 1) SELECT * FROM a"), vec!["Invalid CTE name"]);
    }

    #[test]
    fn cte_body_must_be_parenthesized() {
        assert_eq!(cte_issues("WITH x AS SELECT 1"), vec!["Invalid CTE syntax"]);
        assert_eq!(cte_issues("WITH x AS"), vec!["Invalid CTE syntax"]);
    }

    #[test]
    fn cte_check_ignores_other_statements() {
        assert!(cte_issues("SELECT a AS b FROM t").is_empty());
    }

    #[test]
    fn set_operations_only_apply_to_select() {
        assert!(set_op_issues("DELETE FROM t UNION").is_empty());
    }
}
