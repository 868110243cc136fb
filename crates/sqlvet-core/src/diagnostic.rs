//! Diagnostics produced by the validation stages
//!
//! IMPORTANT: Issue labels are part of the report format.
//! Downstream tooling matches on them - do not reword existing labels.

use serde::{Deserialize, Serialize};

/// Which stage of the pipeline raised a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    /// Tokenizer could not recognize the input
    Lexical,

    /// Balance, closure or nesting violation found in the raw text
    Structural,

    /// Missing or malformed clause
    Grammar,

    /// Dialect policy violation
    Dialect,

    /// Unexpected failure while validating a query
    Fatal,
}

impl DiagnosticCategory {
    /// Get the category as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Structural => "structural",
            Self::Grammar => "grammar",
            Self::Dialect => "dialect",
            Self::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported issue in a query
///
/// Diagnostics are created once and never mutated; a query keeps them in
/// detection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Line number (1-indexed, relative to the query text)
    pub line: usize,

    /// Short label, e.g. "Missing FROM clause"
    pub issue: String,

    /// Human-readable explanation
    pub explanation: String,

    /// Pipeline stage that raised it
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic reported on line 1
    pub fn new(
        category: DiagnosticCategory,
        issue: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            line: 1,
            issue: issue.into(),
            explanation: explanation.into(),
            category,
        }
    }

    /// Structural rule violation
    pub fn structural(issue: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Structural, issue, explanation)
    }

    /// Grammar violation
    pub fn grammar(issue: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Grammar, issue, explanation)
    }

    /// Dialect policy violation
    pub fn dialect(issue: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Dialect, issue, explanation)
    }

    /// Set the line
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.issue, self.explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_stability() {
        assert_eq!(DiagnosticCategory::Structural.as_str(), "structural");
        assert_eq!(DiagnosticCategory::Fatal.as_str(), "fatal");
    }

    #[test]
    fn diagnostic_defaults_to_first_line() {
        let diag = Diagnostic::grammar("Missing FROM clause", "SELECT must contain FROM");
        assert_eq!(diag.line, 1);
        assert_eq!(diag.category, DiagnosticCategory::Grammar);

        let diag = diag.at_line(3);
        assert_eq!(diag.line, 3);
    }

    #[test]
    fn diagnostic_display() {
        let diag = Diagnostic::grammar("Missing FROM clause", "SELECT must contain FROM").at_line(2);
        assert_eq!(diag.to_string(), "line 2: Missing FROM clause: SELECT must contain FROM");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::dialect("Non-ANSI feature", "LIMIT is not supported in ANSI SQL");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"issue\":\"Non-ANSI feature\""));
        assert!(json.contains("\"category\":\"dialect\""));
        assert!(json.contains("\"line\":1"));
    }
}
