//! Structural rules over the raw query text
//!
//! These checks read the raw text, never tokens.

use sqlvet_core::Diagnostic;

/// Apply every structural rule; all checks run, none short-circuits
pub fn apply_rules(sql: &str, max_subquery_depth: usize) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if sql.matches('(').count() != sql.matches(')').count() {
        diagnostics.push(Diagnostic::structural(
            "Unmatched parentheses",
            "Number of ( and ) must be equal",
        ));
    }

    if sql.matches('\'').count() % 2 != 0 {
        diagnostics.push(Diagnostic::structural(
            "Unclosed string literal",
            "String must start and end with single quotes",
        ));
    }

    let depth = subquery_depth(sql);
    if depth > max_subquery_depth {
        diagnostics.push(Diagnostic::structural(
            "Subquery nested too deep",
            format!("Maximum allowed nesting is {}", max_subquery_depth),
        ));
    }

    diagnostics
}

/// High-water mark of parenthesis depth, counting only parenthesized SELECTs
///
/// Each closing paren whose group does not contain SELECT takes one off the
/// running maximum, whatever frame set that maximum. Sibling groups can
/// therefore pull the result below the true subquery depth.
pub fn subquery_depth(sql: &str) -> usize {
    let mut in_string = false;
    let mut prev: Option<char> = None;
    let mut open_parens: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut max_seen = 0usize;

    for (idx, ch) in sql.char_indices() {
        if ch == '\'' && prev != Some('\\') {
            in_string = !in_string;
        } else if !in_string {
            match ch {
                '(' => {
                    open_parens.push(idx);
                    depth += 1;
                    max_seen = max_seen.max(depth);
                }
                ')' => {
                    // Unmatched closers are already reported by the balance check
                    if let Some(start) = open_parens.pop() {
                        depth -= 1;
                        if !contains_select(&sql[start + 1..idx]) {
                            max_seen = max_seen.saturating_sub(1);
                        }
                    }
                }
                _ => {}
            }
        }
        prev = Some(ch);
    }

    max_seen
}

fn contains_select(text: &str) -> bool {
    text.to_ascii_uppercase().contains("SELECT")
}
