//! Rule requiring input variable names to end with the attribute they feed.
//!
//! # Rationale
//!
//! In a module, `name = var.instance_name` makes it obvious which attribute
//! a variable configures. `name = var.foo` does not. This rule enforces that
//! the variable name ends with the attribute name.
//!
//! # Matching
//!
//! The check is a raw, case-sensitive character suffix test with no word
//! boundary: `var.username` passes for `name`. An empty attribute name
//! always passes; one longer than the variable name always fails.
//!
//! # Scope
//!
//! - Only `data` and `resource` blocks are visited, nested blocks included.
//! - Only references rooted at `var` with an attribute step are checked.
//! - Attributes whose whole expression is a conditional or a function call
//!   are not checked. Conditionals and calls nested deeper in an otherwise
//!   eligible expression are.

use hcl_edit::expr::{Expression, ObjectKey, TraversalOperator};
use hcl_edit::structure::{Block, Body};
use hcl_edit::template::{Directive, Element, Template};
use hcl_edit::Span;
use std::ops::Range;
use tracing::{debug, trace};
use varname_lint_core::{FileContext, Reporter, Rule, Severity, Violation};

/// Rule code for variable-suffix.
pub const CODE: &str = "VN001";

/// Rule name for variable-suffix.
pub const NAME: &str = "variable-suffix";

/// Root identifier of input variable references.
pub const VARIABLE_ROOT: &str = "var";

/// Requires `var.<name>` references to end with the enclosing attribute name.
#[derive(Debug, Clone)]
pub struct VariableSuffix {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for VariableSuffix {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableSuffix {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Checks every attribute of `body`, then every nested block.
    ///
    /// Nested blocks are visited whatever the outcome of the attributes;
    /// the result is `true` only if nothing at any depth failed.
    pub fn check_body(&self, ctx: &FileContext, body: &Body, reporter: &mut dyn Reporter) -> bool {
        let mut is_all_valid = true;

        for attribute in body.attributes() {
            let is_valid =
                self.check_attribute(ctx, attribute.key.as_str(), &attribute.value, reporter);
            is_all_valid = is_all_valid && is_valid;
        }

        for block in body.blocks() {
            let is_valid = self.check_body(ctx, &block.body, reporter);
            is_all_valid = is_all_valid && is_valid;
        }

        is_all_valid
    }

    fn check_attribute(
        &self,
        ctx: &FileContext,
        attribute: &str,
        expr: &Expression,
        reporter: &mut dyn Reporter,
    ) -> bool {
        if is_exempt(expr) {
            trace!("Skipping exempt expression in attribute `{attribute}`");
            return true;
        }

        let mut refs = Vec::new();
        collect_variable_refs(expr, &mut refs);

        let mut is_all_valid = true;
        for var_ref in refs.iter().filter(|r| r.root == VARIABLE_ROOT) {
            let Some(span) = var_ref.span.clone() else {
                debug!(
                    "No source position for `var.{}` in attribute `{attribute}`, skipping",
                    var_ref.name
                );
                continue;
            };
            let is_valid = self.evaluate(ctx, var_ref.name, attribute, span, reporter);
            is_all_valid = is_all_valid && is_valid;
        }

        is_all_valid
    }

    /// Applies the suffix rule to one reference, reporting a violation on failure.
    ///
    /// `span` is the byte range of the `var` token.
    pub fn evaluate(
        &self,
        ctx: &FileContext,
        variable: &str,
        attribute: &str,
        span: Range<usize>,
        reporter: &mut dyn Reporter,
    ) -> bool {
        if matches_suffix(variable, attribute) {
            return true;
        }

        let violation = Violation::new(
            CODE,
            NAME,
            self.severity,
            ctx.location(span),
            attribute,
            variable,
        )
        .with_help(format!(
            "rename `var.{variable}` so that it ends with `{attribute}`"
        ));
        reporter.violation(&violation);
        false
    }
}

impl Rule for VariableSuffix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires var.<name> to end with the name of the attribute it is assigned to"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, block: &Block, reporter: &mut dyn Reporter) -> bool {
        self.check_body(ctx, &block.body, reporter)
    }
}

/// Returns true if `variable` ends with `attribute`.
#[must_use]
pub fn matches_suffix(variable: &str, attribute: &str) -> bool {
    variable.ends_with(attribute)
}

/// Conditionals and function calls at the top of an attribute are not checked.
fn is_exempt(expr: &Expression) -> bool {
    matches!(expr, Expression::Conditional(_) | Expression::FuncCall(_))
}

/// A reference of the form `<root>.<name>` found in an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef<'a> {
    /// Root identifier, e.g. `var` or `local`.
    pub root: &'a str,
    /// First attribute step after the root.
    pub name: &'a str,
    /// Byte range of the root token.
    pub span: Option<Range<usize>>,
}

/// Collects every `<root>.<name>` reference in `expr`, at any depth.
///
/// Bare roots and roots followed by an index or splat carry no name and
/// are left out, as are references to the iterator variables of an
/// enclosing `for` expression or `%{for}` directive.
pub fn collect_variable_refs<'a>(expr: &'a Expression, refs: &mut Vec<VariableRef<'a>>) {
    match expr {
        Expression::Null(_)
        | Expression::Bool(_)
        | Expression::Number(_)
        | Expression::String(_)
        | Expression::Variable(_) => {}
        Expression::Array(elements) => {
            for element in elements.iter() {
                collect_variable_refs(element, refs);
            }
        }
        Expression::Object(obj) => {
            for (key, value) in obj.iter() {
                if let ObjectKey::Expression(key_expr) = key {
                    collect_variable_refs(key_expr, refs);
                }
                collect_variable_refs(value.expr(), refs);
            }
        }
        Expression::StringTemplate(template) => collect_from_template(template, refs),
        Expression::HeredocTemplate(heredoc) => collect_from_template(&heredoc.template, refs),
        Expression::Parenthesis(inner) => collect_variable_refs(inner.inner(), refs),
        Expression::Conditional(cond) => {
            collect_variable_refs(&cond.cond_expr, refs);
            collect_variable_refs(&cond.true_expr, refs);
            collect_variable_refs(&cond.false_expr, refs);
        }
        Expression::FuncCall(call) => {
            for arg in call.args.iter() {
                collect_variable_refs(arg, refs);
            }
        }
        Expression::Traversal(traversal) => {
            match &traversal.expr {
                Expression::Variable(root) => {
                    let first_attr = traversal.operators.first().and_then(|op| match op.value() {
                        TraversalOperator::GetAttr(ident) => Some(ident.as_str()),
                        _ => None,
                    });
                    if let Some(name) = first_attr {
                        refs.push(VariableRef {
                            root: root.as_str(),
                            name,
                            span: root.span(),
                        });
                    }
                }
                other => collect_variable_refs(other, refs),
            }
            for op in &traversal.operators {
                if let TraversalOperator::Index(index) = op.value() {
                    collect_variable_refs(index, refs);
                }
            }
        }
        Expression::UnaryOp(op) => collect_variable_refs(&op.expr, refs),
        Expression::BinaryOp(op) => {
            collect_variable_refs(&op.lhs_expr, refs);
            collect_variable_refs(&op.rhs_expr, refs);
        }
        Expression::ForExpr(for_expr) => {
            let intro = &for_expr.intro;
            collect_variable_refs(&intro.collection_expr, refs);

            let mut scoped = Vec::new();
            if let Some(key_expr) = &for_expr.key_expr {
                collect_variable_refs(key_expr, &mut scoped);
            }
            collect_variable_refs(&for_expr.value_expr, &mut scoped);
            if let Some(cond) = &for_expr.cond {
                collect_variable_refs(&cond.expr, &mut scoped);
            }

            let bound: Vec<&str> = intro
                .key_var
                .iter()
                .chain([&intro.value_var])
                .map(|ident| ident.as_str())
                .collect();
            extend_unbound(refs, scoped, &bound);
        }
    }
}

fn collect_from_template<'a>(template: &'a Template, refs: &mut Vec<VariableRef<'a>>) {
    for element in template.iter() {
        collect_from_element(element, refs);
    }
}

fn collect_from_element<'a>(element: &'a Element, refs: &mut Vec<VariableRef<'a>>) {
    match element {
        Element::Literal(_) => {}
        Element::Interpolation(interpolation) => {
            collect_variable_refs(&interpolation.expr, refs);
        }
        Element::Directive(Directive::If(directive)) => {
            collect_variable_refs(&directive.if_expr.cond_expr, refs);
            collect_from_template(&directive.if_expr.template, refs);
            if let Some(else_expr) = &directive.else_expr {
                collect_from_template(&else_expr.template, refs);
            }
        }
        Element::Directive(Directive::For(directive)) => {
            let for_expr = &directive.for_expr;
            collect_variable_refs(&for_expr.collection_expr, refs);

            let mut scoped = Vec::new();
            collect_from_template(&for_expr.template, &mut scoped);

            let bound: Vec<&str> = for_expr
                .key_var
                .iter()
                .chain([&for_expr.value_var])
                .map(|ident| ident.as_str())
                .collect();
            extend_unbound(refs, scoped, &bound);
        }
    }
}

/// Appends `scoped` to `refs`, minus references rooted at a `bound` iterator.
fn extend_unbound<'a>(
    refs: &mut Vec<VariableRef<'a>>,
    scoped: Vec<VariableRef<'a>>,
    bound: &[&str],
) {
    refs.extend(scoped.into_iter().filter(|r| !bound.contains(&r.root)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_edit::expr::Traversal;
    use hcl_edit::{Decorated, Ident};
    use std::path::Path;
    use varname_lint_core::{CollectingReporter, ConfigDocument};

    fn check_code(code: &str) -> (bool, Vec<String>) {
        let doc = ConfigDocument::parse("main.tf", code).expect("Failed to parse");
        let ctx = doc.context();
        let rule = VariableSuffix::new();
        let mut reporter = CollectingReporter::new();
        let mut valid = true;
        for block in doc.blocks() {
            valid = rule.check(&ctx, block, &mut reporter) && valid;
        }
        (valid, reporter.messages().to_vec())
    }

    fn refs_in(expr_src: &str) -> Vec<(String, String)> {
        let doc = ConfigDocument::parse("x.tf", format!("a = {expr_src}\n")).expect("parse");
        let attr = doc.body().attributes().next().expect("attribute");
        let mut refs = Vec::new();
        collect_variable_refs(&attr.value, &mut refs);
        refs.into_iter()
            .map(|r| (r.root.to_string(), r.name.to_string()))
            .collect()
    }

    #[test]
    fn suffix_match_is_raw_and_case_sensitive() {
        assert!(matches_suffix("instance_name", "name"));
        assert!(matches_suffix("username", "name"));
        assert!(matches_suffix("name", "name"));
        assert!(matches_suffix("anything", ""));
        assert!(matches_suffix("", ""));
        assert!(!matches_suffix("foo", "name"));
        assert!(!matches_suffix("name_prefix", "name"));
        assert!(!matches_suffix("instance_Name", "name"));
        assert!(!matches_suffix("me", "name"));
        assert!(!matches_suffix("ame", "name"));
    }

    #[test]
    fn suffix_match_only_considers_the_end() {
        // "name" occurs twice; only the trailing one counts
        assert!(matches_suffix("name_of_name", "name"));
        assert!(!matches_suffix("name_of_names", "name"));
    }

    #[test]
    fn matching_variable_passes() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = var.instance_name
}
"#,
        );
        assert!(valid);
        assert!(messages.is_empty());
    }

    #[test]
    fn mismatched_variable_reports_location() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = var.foo
}
"#,
        );
        assert!(!valid);
        assert_eq!(
            messages,
            vec!["main.tf:Line:3 Column:10; Property: name; Variable: foo"]
        );
    }

    #[test]
    fn nested_block_violation_is_reported() {
        let (valid, messages) = check_code(
            r#"
data "x" "y" {
  filter {
    values = var.ids
    inner {
      tag = var.label
    }
  }
}
"#,
        );
        assert!(!valid);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("Property: values; Variable: ids"));
        assert!(messages[1].contains("Line:6 Column:13; Property: tag; Variable: label"));
    }

    #[test]
    fn nested_blocks_visited_after_parent_failure() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = var.wrong
  a { id = var.bad }
  b { id = var.also_bad }
  c { id = var.vpc_id }
}
"#,
        );
        assert!(!valid);
        assert_eq!(messages.len(), 3);
        assert!(messages[2].contains("Variable: also_bad"));
    }

    #[test]
    fn conditional_and_function_call_are_exempt() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name  = var.enabled ? var.foo : var.bar
  tags  = merge(var.common, var.extra)
  count = length(var.whatever)
}
"#,
        );
        assert!(valid);
        assert!(messages.is_empty());
    }

    #[test]
    fn exemption_applies_only_at_top_of_attribute() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = "${upper(var.foo)}-${var.prefix_name}"
}
"#,
        );
        assert!(!valid);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Variable: foo"));
    }

    #[test]
    fn other_roots_are_ignored() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name   = local.foo
  vpc_id = module.network.id
  ami    = data.aws_ami.ubuntu.id
  zone   = each.value
}
"#,
        );
        assert!(valid);
        assert!(messages.is_empty());
    }

    #[test]
    fn every_reference_in_an_attribute_is_checked() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = "${var.env_name}-${var.region}-${var.app}"
}
"#,
        );
        assert!(!valid);
        assert_eq!(
            messages,
            vec![
                "main.tf:Line:3 Column:29; Property: name; Variable: region",
                "main.tf:Line:3 Column:43; Property: name; Variable: app",
            ]
        );
    }

    #[test]
    fn top_level_attributes_are_not_blocks() {
        // Only block bodies are inspected by the rule itself
        let (valid, messages) = check_code("name = var.foo\n");
        assert!(valid);
        assert!(messages.is_empty());
    }

    #[test]
    fn collects_refs_through_nested_expressions() {
        assert_eq!(
            refs_in("[var.a, { k = var.b }, (var.c), -var.d, var.e + 1]"),
            vec![
                ("var".into(), "a".into()),
                ("var".into(), "b".into()),
                ("var".into(), "c".into()),
                ("var".into(), "d".into()),
                ("var".into(), "e".into()),
            ]
        );
    }

    #[test]
    fn collects_refs_from_traversal_indexes_and_for_expressions() {
        assert_eq!(
            refs_in("local.map[var.key]"),
            vec![("local".into(), "map".into()), ("var".into(), "key".into())]
        );
        assert_eq!(
            refs_in("[for s in var.subnets : s.id if s.public]"),
            vec![("var".into(), "subnets".into())]
        );
        assert_eq!(
            refs_in("{ for k, v in var.tags : k => v.value if local.keep[k] }"),
            vec![("var".into(), "tags".into()), ("local".into(), "keep".into())]
        );
    }

    #[test]
    fn for_expression_iterators_shadow_references() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = [for var in local.xs : var.name_x]
}
"#,
        );
        assert!(valid);
        assert!(messages.is_empty());
    }

    #[test]
    fn if_directive_references_are_checked() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  name = "%{if var.foo != ""}a%{else}${var.other}%{endif}"
}
"#,
        );
        assert!(!valid);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].ends_with("Property: name; Variable: foo"));
        assert!(messages[1].ends_with("Property: name; Variable: other"));
    }

    #[test]
    fn for_directive_in_heredoc_is_checked() {
        let (valid, messages) = check_code(
            r#"
resource "x" "y" {
  names = <<EOT
%{for s in var.items}${s.name}%{endfor}
EOT
}
"#,
        );
        assert!(!valid);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with("Property: names; Variable: items"));
    }

    #[test]
    fn for_directive_iterator_is_not_an_input_variable() {
        assert_eq!(
            refs_in("\"%{for var in local.xs}${var.id}%{endfor}\""),
            vec![("local".into(), "xs".into())]
        );
    }

    #[test]
    fn reference_without_position_is_skipped() {
        let expr = Expression::from(Traversal::new(
            Ident::new("var"),
            vec![Decorated::new(TraversalOperator::GetAttr(
                Ident::new("foo").into(),
            ))],
        ));
        let ctx = FileContext::new(Path::new("main.tf"), "");
        let mut reporter = CollectingReporter::new();

        assert!(VariableSuffix::new().check_attribute(&ctx, "name", &expr, &mut reporter));
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn name_comes_from_first_attribute_step() {
        assert_eq!(refs_in("var.config.name"), vec![("var".into(), "config".into())]);
        assert!(refs_in("var").is_empty());
        assert!(refs_in("var[0]").is_empty());
    }

    #[test]
    fn evaluate_reports_at_span() {
        let source = "resource \"x\" \"y\" {\n  id = var.foo\n}\n";
        let ctx = FileContext::new(Path::new("mod/main.tf"), source);
        let start = source.find("var").unwrap();
        let mut reporter = CollectingReporter::new();

        let ok = VariableSuffix::new().evaluate(&ctx, "foo", "id", start..start + 3, &mut reporter);

        assert!(!ok);
        let violation = &reporter.violations()[0];
        assert_eq!(violation.code, CODE);
        assert_eq!(violation.location.line, 2);
        assert_eq!(violation.location.column, 8);
        assert_eq!(violation.location.offset, start);
        assert_eq!(
            reporter.messages(),
            ["mod/main.tf:Line:2 Column:8; Property: id; Variable: foo"]
        );
    }

    #[test]
    fn evaluate_pass_has_no_side_effect() {
        let ctx = FileContext::new(Path::new("main.tf"), "");
        let mut reporter = CollectingReporter::new();
        assert!(VariableSuffix::new().evaluate(&ctx, "vpc_id", "id", 0..3, &mut reporter));
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn severity_is_carried_to_violations() {
        let doc = ConfigDocument::parse("main.tf", "resource \"x\" \"y\" {\n  a = var.b\n}\n")
            .expect("parse");
        let mut reporter = CollectingReporter::new();
        let rule = VariableSuffix::new().severity(Severity::Warning);
        for block in doc.blocks() {
            rule.check(&doc.context(), block, &mut reporter);
        }
        assert_eq!(reporter.violations()[0].severity, Severity::Warning);
    }
}
