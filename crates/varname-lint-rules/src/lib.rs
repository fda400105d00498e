//! # varname-lint-rules
//!
//! Built-in lint rules for varname-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | VN001 | `variable-suffix` | Requires `var.<name>` to end with the attribute name |
//!
//! ## Usage
//!
//! ```ignore
//! use varname_lint_core::{Analyzer, TracingReporter};
//! use varname_lint_rules::VariableSuffix;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./modules/network")
//!     .rule(VariableSuffix::new())
//!     .build()?;
//!
//! let valid = analyzer.validate(&mut TracingReporter);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod variable_suffix;

pub use variable_suffix::{
    collect_variable_refs, matches_suffix, VariableRef, VariableSuffix, VARIABLE_ROOT,
};

/// Re-export core types for convenience.
pub use varname_lint_core::{Rule, RuleBox, Severity, Violation};

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(VariableSuffix::new())]
}

/// Looks up a rule by name or code.
#[must_use]
pub fn rule_by_name(name: &str) -> Option<RuleBox> {
    match name {
        variable_suffix::NAME | variable_suffix::CODE => Some(Box::new(VariableSuffix::new())),
        _ => None,
    }
}
