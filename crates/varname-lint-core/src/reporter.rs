//! Sinks for diagnostics emitted during a run.

use crate::types::{LintResult, Violation};

/// Receives error-level diagnostics as they are detected.
///
/// Calls are fire-and-forget; the analyzer never inspects what a reporter
/// did with a message.
pub trait Reporter {
    /// Records an error message.
    fn error(&mut self, message: &str);

    /// Records a naming violation.
    ///
    /// The default forwards the violation's diagnostic line to [`Reporter::error`].
    fn violation(&mut self, violation: &Violation) {
        self.error(&violation.to_string());
    }
}

/// Emits every diagnostic through `tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Vec<String>,
    errors: Vec<String>,
    violations: Vec<Violation>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message received, in order, violations included.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Violations received, in order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Converts the collected diagnostics into a [`LintResult`].
    #[must_use]
    pub fn into_result(self, valid: bool, files_checked: usize) -> LintResult {
        LintResult {
            violations: self.violations,
            errors: self.errors,
            files_checked,
            valid,
        }
    }
}

impl Reporter for CollectingReporter {
    fn error(&mut self, message: &str) {
        self.messages.push(message.to_string());
        self.errors.push(message.to_string());
    }

    fn violation(&mut self, violation: &Violation) {
        self.messages.push(violation.to_string());
        self.violations.push(violation.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};
    use std::path::PathBuf;

    #[test]
    fn collects_errors_and_violations_in_order() {
        let violation = Violation::new(
            "VN001",
            "variable-suffix",
            Severity::Error,
            Location::new(PathBuf::from("a.tf"), 1, 8),
            "name",
            "foo",
        );

        let mut reporter = CollectingReporter::new();
        reporter.error("first");
        reporter.violation(&violation);

        assert_eq!(
            reporter.messages(),
            ["first", "a.tf:Line:1 Column:8; Property: name; Variable: foo"]
        );
        assert_eq!(reporter.violations().len(), 1);

        let result = reporter.into_result(false, 1);
        assert_eq!(result.errors, vec!["first".to_string()]);
        assert_eq!(result.violations.len(), 1);
        assert!(!result.valid);
    }

    #[test]
    fn default_violation_forwards_diagnostic_line() {
        struct Lines(Vec<String>);
        impl Reporter for Lines {
            fn error(&mut self, message: &str) {
                self.0.push(message.to_string());
            }
        }

        let mut lines = Lines(Vec::new());
        lines.violation(&Violation::new(
            "VN001",
            "variable-suffix",
            Severity::Error,
            Location::new(PathBuf::from("b.tf"), 4, 2),
            "id",
            "vpc",
        ));
        assert_eq!(lines.0, vec!["b.tf:Line:4 Column:2; Property: id; Variable: vpc"]);
    }
}
