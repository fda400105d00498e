//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use varname_lint_core::{Analyzer, Config, RuleBox, TracingReporter};
use varname_lint_rules::{all_rules, rule_by_name};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// How results are printed.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run instead of all rules.
    pub rules_filter: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Scan subdirectories as well.
    pub recursive: bool,
}

/// Runs the check command, returning whether the module is valid.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let recursive = options.recursive || config.analyzer.recursive;

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .recursive(recursive)
        .excludes(options.exclude.iter().cloned());

    let rules = match &options.rules_filter {
        Some(filter) => filter_rules(filter),
        None => all_rules(),
    };
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    match options.format {
        OutputFormat::Log => {
            let valid = analyzer.validate(&mut TracingReporter);
            super::output::print_verdict(valid);
            Ok(valid)
        }
        format => {
            let result = analyzer.analyze();
            super::output::print(&result, format)?;
            Ok(result.valid)
        }
    }
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source.path() {
        None => Ok(Config::default()),
        Some(p) => {
            if matches!(source, ConfigSource::Global(_)) {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

fn filter_rules(filter: &str) -> Vec<RuleBox> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let rule = rule_by_name(name);
            if rule.is_none() {
                tracing::warn!("Unknown rule: {}", name);
            }
            rule
        })
        .collect()
}
