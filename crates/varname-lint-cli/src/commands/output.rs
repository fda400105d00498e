//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{NamedSource, Report};
use varname_lint_core::{LintResult, ViolationDiagnostic};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text | OutputFormat::Log => print_text(result),
        OutputFormat::Pretty => print_pretty(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

/// Prints the one-line outcome of a streamed run.
pub fn print_verdict(valid: bool) {
    if valid {
        println!("\x1b[32mAll variable names match their attributes\x1b[0m");
    } else {
        println!("\x1b[31mNaming check failed\x1b[0m");
    }
}

fn print_text(result: &LintResult) {
    for error in &result.errors {
        println!("\x1b[31merror\x1b[0m: {error}");
    }

    for violation in &result.violations {
        println!("{}", violation.format());
    }

    print_summary(result);
}

fn print_pretty(result: &LintResult) {
    for error in &result.errors {
        eprintln!("\x1b[31merror\x1b[0m: {error}");
    }

    for violation in &result.violations {
        let file = &violation.location.file;
        let report = Report::new(ViolationDiagnostic::from(violation));
        // Fall back to the plain line when the file has changed or vanished.
        match std::fs::read_to_string(file) {
            Ok(source) => {
                let report =
                    report.with_source_code(NamedSource::new(file.display().to_string(), source));
                eprintln!("{report:?}");
            }
            Err(_) => eprintln!("{violation}"),
        }
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let summary_color = if result.valid { "\x1b[32m" } else { "\x1b[31m" };

    println!(
        "{}Found {} violation(s) in {} file(s)\x1b[0m",
        summary_color,
        result.violations.len(),
        result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for error in &result.errors {
        println!("{error}");
    }
    for violation in &result.violations {
        println!("{violation}");
    }
}
