//! # varname-lint-core
//!
//! Core framework for naming-convention linting of HCL configuration,
//! built on the `hcl-edit` syntax tree.
//!
//! This crate provides the foundational traits and types:
//!
//! - [`Rule`] trait for rules applied to `data` and `resource` blocks
//! - [`Reader`] and [`Reporter`] collaborators for input and diagnostics
//! - [`Analyzer`] for orchestrating lint execution
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use varname_lint_core::{Analyzer, TracingReporter};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./modules/network")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let valid = analyzer.validate(&mut TracingReporter);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod document;
mod reader;
mod reporter;
mod rule;
mod types;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, CHECKED_BLOCK_TYPES};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use document::ConfigDocument;
pub use reader::{ModuleReader, ReadError, Reader, ReaderBox, DEFAULT_EXTENSION};
pub use reporter::{CollectingReporter, Reporter, TracingReporter};
pub use rule::{Rule, RuleBox};
pub use types::{LintResult, Location, Severity, Violation, ViolationDiagnostic};

/// Re-export of the HCL syntax tree used by rules.
pub use hcl_edit;
