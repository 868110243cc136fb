//! Validation pipeline for a batch of queries
//!
//! Every query runs through: tokenize -> structural rules -> grammar ->
//! dialect hooks (-> extended checks). Only a lexical failure or an
//! unexpected panic stops a query early, and neither leaves the query.

use std::panic::{self, AssertUnwindSafe};

use sqlvet_core::{Diagnostic, DiagnosticCategory, QueryRecord, RunSummary, ValidationResult};
use sqlvet_sql::{apply_rules, classify, extended_checks, parse, tokenize, Dialect, LexError};

use crate::writer::{ReportSink, WriteError};

/// Failure that ends one query's pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    /// The single diagnostic a failed query reports
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PipelineError::Lexical(err) => {
                Diagnostic::new(DiagnosticCategory::Lexical, "Syntax Error", err.to_string())
                    .at_line(err.line)
            }
            PipelineError::Unexpected(message) => {
                Diagnostic::new(DiagnosticCategory::Fatal, "Fatal error", message.clone())
            }
        }
    }
}

/// Validates queries against one dialect
pub struct Validator<'d> {
    dialect: &'d dyn Dialect,
    extended_checks: bool,
}

impl<'d> Validator<'d> {
    /// Create a validator for a resolved dialect
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            extended_checks: false,
        }
    }

    /// Also run the subquery and set-operation checks
    pub fn with_extended_checks(mut self, enabled: bool) -> Self {
        self.extended_checks = enabled;
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    /// Run the pipeline over one query's text
    ///
    /// Diagnostics keep detection order: structural, grammar, then the
    /// dialect's statement, clause and DDL hooks.
    pub fn check(&self, sql: &str) -> Result<Vec<Diagnostic>, PipelineError> {
        let tokens = tokenize(sql)?;

        let Some(stmt) = classify(&tokens) else {
            return Ok(vec![Diagnostic::grammar("Empty query", "No SQL statement found")]);
        };

        let mut diagnostics = apply_rules(sql, self.dialect.max_subquery_depth());
        diagnostics.extend(parse(sql, &tokens));
        diagnostics.extend(self.dialect.validate_statement(&stmt, &tokens));
        diagnostics.extend(self.dialect.validate_clauses(&stmt, &tokens));
        diagnostics.extend(self.dialect.validate_ddl(&stmt, &tokens));

        if self.extended_checks {
            diagnostics.extend(extended_checks(sql, &stmt, &tokens));
        }

        Ok(diagnostics)
    }

    /// Diagnostics for one query; pipeline failures become one diagnostic
    pub fn validate_sql(&self, sql: &str) -> Vec<Diagnostic> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.check(sql)))
            .unwrap_or_else(|payload| Err(PipelineError::Unexpected(panic_message(payload))));

        match outcome {
            Ok(diagnostics) => diagnostics,
            Err(err) => {
                tracing::warn!(error = %err, "query pipeline stopped");
                vec![err.to_diagnostic()]
            }
        }
    }

    /// Validate one query record
    pub fn validate(&self, query_id: usize, record: QueryRecord) -> ValidationResult {
        tracing::debug!(query_id, source = %record.source_label, "validating query");

        let diagnostics = self.validate_sql(&record.sql_text);
        ValidationResult::new(query_id, record, diagnostics)
    }

    /// Validate a batch in order, handing each result to `sink`
    ///
    /// Query ids start at 1. Only sink failures abort the run.
    pub fn run<I, S>(&self, queries: I, sink: &mut S) -> Result<RunSummary, WriteError>
    where
        I: IntoIterator<Item = QueryRecord>,
        S: ReportSink + ?Sized,
    {
        let mut summary = RunSummary::new(self.dialect.name());

        for (idx, record) in queries.into_iter().enumerate() {
            let result = self.validate(idx + 1, record);
            tracing::debug!(
                query_id = result.query_id,
                status = %result.status,
                diagnostics = result.diagnostics.len(),
                "query validated"
            );

            summary.record(&result);
            sink.write(&result)?;
        }

        tracing::info!(
            dialect = self.dialect.name(),
            processed = summary.processed,
            passed = summary.passed,
            failed = summary.failed,
            "validation run finished"
        );

        Ok(summary)
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure while validating query".to_string()
    }
}
