//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::document::ConfigDocument;
use crate::reader::{ModuleReader, Reader, ReaderBox};
use crate::reporter::{CollectingReporter, Reporter};
use crate::rule::{Rule, RuleBox};
use crate::types::LintResult;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Top-level block types whose bodies are checked. All others are skipped.
pub const CHECKED_BLOCK_TYPES: &[&str] = &["data", "resource"];

/// Errors that can occur while building an analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// An exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    recursive: Option<bool>,
    reader: Option<ReaderBox>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module directory or file to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether subdirectories are scanned, overriding the config.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Replaces the default [`ModuleReader`].
    ///
    /// Exclude patterns and `recursive` only apply to the default reader.
    #[must_use]
    pub fn reader<R: Reader + 'static>(mut self, reader: R) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern for the default reader is not
    /// a valid glob.
    ///
    /// The root is kept as given, so diagnostics show paths relative to it
    /// when it is relative.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let reader = match self.reader {
            Some(reader) => reader,
            None => {
                // Merge exclude patterns from config
                let mut exclude_patterns = self.exclude_patterns;
                exclude_patterns.extend(config.analyzer.exclude.clone());
                for pattern in &exclude_patterns {
                    glob::Pattern::new(pattern)?;
                }

                Box::new(
                    ModuleReader::new()
                        .recursive(self.recursive.unwrap_or(config.analyzer.recursive))
                        .excludes(exclude_patterns),
                )
            }
        };

        Ok(Analyzer {
            root,
            rules: self.rules,
            reader,
            config,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance. An analyzer holds
/// no state between runs; calling [`Analyzer::validate`] twice over
/// unchanged input yields the same result and the same diagnostics.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    reader: ReaderBox,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs every enabled rule over the module and reports through `reporter`.
    ///
    /// Returns `true` when no violation was found. A read failure is
    /// reported once and makes the run invalid without checking any file.
    pub fn validate(&self, reporter: &mut dyn Reporter) -> bool {
        self.run(reporter).0
    }

    /// Runs the analysis and collects every diagnostic into a [`LintResult`].
    #[must_use]
    pub fn analyze(&self) -> LintResult {
        let mut reporter = CollectingReporter::new();
        let (valid, files_checked) = self.run(&mut reporter);
        reporter.into_result(valid, files_checked)
    }

    fn run(&self, reporter: &mut dyn Reporter) -> (bool, usize) {
        info!("Starting analysis at {:?}", self.root);

        let documents = match self.reader.read(&self.root) {
            Ok(documents) => documents,
            Err(e) => {
                reporter.error(&e.to_string());
                return (false, 0);
            }
        };

        info!("Found {} files to analyze", documents.len());

        let rules: Vec<&dyn Rule> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .map(|rule| &**rule)
            .collect();

        let mut is_all_valid = true;
        for doc in &documents {
            let is_valid = check_document(doc, &rules, reporter);
            is_all_valid = is_all_valid && is_valid;
        }

        info!(
            "Analysis complete: {} in {} files",
            if is_all_valid { "valid" } else { "invalid" },
            documents.len()
        );

        (is_all_valid, documents.len())
    }
}

/// Runs `rules` over every `data` and `resource` block of one document.
fn check_document(
    doc: &ConfigDocument,
    rules: &[&dyn Rule],
    reporter: &mut dyn Reporter,
) -> bool {
    debug!("Analyzing: {}", doc.path().display());

    let ctx = doc.context();
    let mut is_all_valid = true;

    for block in doc.blocks() {
        let block_type = block.ident.as_str();
        if !CHECKED_BLOCK_TYPES.contains(&block_type) {
            debug!("Skipping `{}` block in {}", block_type, doc.path().display());
            continue;
        }

        for rule in rules {
            let is_valid = rule.check(&ctx, block, reporter);
            is_all_valid = is_all_valid && is_valid;
        }
    }

    is_all_valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use crate::reader::ReadError;
    use hcl_edit::structure::{Block, BlockLabel};

    /// Fails every block labeled "bad".
    struct LabelRule;

    impl Rule for LabelRule {
        fn name(&self) -> &'static str {
            "label-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn check(&self, ctx: &FileContext, block: &Block, reporter: &mut dyn Reporter) -> bool {
            let bad = block.labels.iter().any(|label| match label {
                BlockLabel::String(s) => s.as_str() == "bad",
                BlockLabel::Ident(i) => i.as_str() == "bad",
            });
            if bad {
                reporter.error(&format!("{}: bad block", ctx.path.display()));
            }
            !bad
        }
    }

    struct StaticReader(Vec<(&'static str, &'static str)>);

    impl Reader for StaticReader {
        fn read(&self, _path: &Path) -> Result<Vec<ConfigDocument>, ReadError> {
            self.0
                .iter()
                .map(|(path, source)| {
                    ConfigDocument::parse(*path, *source).map_err(|e| ReadError::Parse {
                        path: PathBuf::from(*path),
                        message: e.to_string(),
                    })
                })
                .collect()
        }
    }

    struct FailingReader;

    impl Reader for FailingReader {
        fn read(&self, path: &Path) -> Result<Vec<ConfigDocument>, ReadError> {
            Err(ReadError::NotFound(path.to_path_buf()))
        }
    }

    fn analyzer(reader: impl Reader + 'static) -> Analyzer {
        Analyzer::builder()
            .root("/module")
            .reader(reader)
            .rule(LabelRule)
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/.terraform/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn relative_root_is_kept_as_given() {
        let analyzer = Analyzer::builder()
            .root("modules/network")
            .build()
            .expect("Failed to build analyzer");

        assert_eq!(analyzer.root(), Path::new("modules/network"));
    }

    #[test]
    fn invalid_exclude_pattern_fails_build() {
        let result = Analyzer::builder().root(".").exclude("[unclosed").build();
        assert!(matches!(result, Err(AnalyzerError::Pattern(_))));
    }

    #[test]
    fn only_data_and_resource_blocks_are_checked() {
        let analyzer = analyzer(StaticReader(vec![(
            "main.tf",
            r#"
variable "bad" {}
output "bad" { value = 1 }
data "bad" "x" {}
resource "bad" "y" {}
"#,
        )]));

        let mut reporter = CollectingReporter::new();
        assert!(!analyzer.validate(&mut reporter));
        assert_eq!(reporter.messages().len(), 2);
    }

    #[test]
    fn all_documents_are_checked_after_a_failure() {
        let analyzer = analyzer(StaticReader(vec![
            ("a.tf", "resource \"bad\" \"x\" {}\n"),
            ("b.tf", "resource \"ok\" \"x\" {}\n"),
            ("c.tf", "data \"bad\" \"x\" {}\n"),
        ]));

        let result = analyzer.analyze();
        assert!(!result.valid);
        assert_eq!(result.files_checked, 3);
        assert_eq!(result.errors, vec!["a.tf: bad block", "c.tf: bad block"]);
    }

    #[test]
    fn no_qualifying_blocks_is_vacuously_valid() {
        let analyzer = analyzer(StaticReader(vec![(
            "vars.tf",
            "variable \"bad\" {}\nlocals { bad = 1 }\n",
        )]));

        let mut reporter = CollectingReporter::new();
        assert!(analyzer.validate(&mut reporter));
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn no_documents_is_vacuously_valid() {
        let mut reporter = CollectingReporter::new();
        assert!(analyzer(StaticReader(vec![])).validate(&mut reporter));
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn read_failure_is_reported_and_invalid() {
        let result = analyzer(FailingReader).analyze();
        assert!(!result.valid);
        assert_eq!(result.files_checked, 0);
        assert_eq!(result.errors, vec!["No such file or directory: /module"]);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = Config::parse("[rules.label-rule]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .root("/module")
            .config(config)
            .reader(StaticReader(vec![("a.tf", "resource \"bad\" \"x\" {}\n")]))
            .rule(LabelRule)
            .build()
            .unwrap();

        assert!(analyzer.analyze().valid);
    }
}
