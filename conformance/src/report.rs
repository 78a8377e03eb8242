//! Conformance report: one result per validator, with failure details.

use causeway_metamodel::ValidationFailures;
use serde::Serialize;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Reported but tolerated by the environment.
    Warning,
    /// The check failed.
    Failure,
}

impl Severity {
    /// Label used in printed reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Name of the validator that produced this result.
    pub validator: String,
    /// Summary of the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// One line per reported problem.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl TestResult {
    fn new(
        validator: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        details: Vec<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity,
            details,
        }
    }

    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Pass, Vec::new())
    }

    /// Creates a failure result.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Failure, Vec::new())
    }

    /// Creates a failure result with detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self::new(validator, message, Severity::Failure, details)
    }

    /// Creates a warning result with detail lines.
    pub fn warn_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self::new(validator, message, Severity::Warning, details)
    }

    /// Returns true if this result is a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }

    /// Summarises what one validator reported.
    ///
    /// With `tolerate` set, problems are downgraded to a warning.
    #[must_use]
    pub fn from_failures(validator: &str, failures: &ValidationFailures, tolerate: bool) -> Self {
        let details: Vec<String> = failures
            .by_validator(validator)
            .map(|f| format!("{}: {}", f.origin, f.message()))
            .collect();
        match details.len() {
            0 => Self::pass(validator, "no problems found"),
            n if tolerate => Self::warn_with_details(validator, format!("{n} problem(s) found"), details),
            n => Self::fail_with_details(validator, format!("{n} problem(s) found"), details),
        }
    }
}

/// Aggregated report over all validators.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// Results in the order the validators ran.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Appends every result of another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of checks with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// The result reported under a validator name.
    #[must_use]
    pub fn result(&self, validator: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.validator == validator)
    }

    /// Pretty JSON rendering of the report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
