//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::reporter::Reporter;
use crate::types::Severity;
use hcl_edit::structure::Block;

/// A lint rule applied to one top-level declaration block.
///
/// The analyzer hands each `data` and `resource` block to every enabled
/// rule. A rule reports each finding through the reporter as it is
/// detected and returns whether the block passed.
///
/// # Example
///
/// ```ignore
/// use varname_lint_core::{FileContext, Reporter, Rule};
/// use hcl_edit::structure::Block;
///
/// pub struct NoEmptyBlocks;
///
/// impl Rule for NoEmptyBlocks {
///     fn name(&self) -> &'static str { "no-empty-blocks" }
///     fn code(&self) -> &'static str { "VN900" }
///
///     fn check(&self, ctx: &FileContext, block: &Block, reporter: &mut dyn Reporter) -> bool {
///         if block.body.is_empty() {
///             reporter.error(&format!("{}: empty block", ctx.path.display()));
///             return false;
///         }
///         true
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "variable-suffix").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "VN001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks a top-level block, reporting every violation found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `block` - The declaration block to check
    /// * `reporter` - Sink for diagnostics
    ///
    /// # Returns
    ///
    /// `true` if the block has no violations.
    fn check(&self, ctx: &FileContext, block: &Block, reporter: &mut dyn Reporter) -> bool;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
