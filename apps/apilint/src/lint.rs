//! Rule evaluation engine.
//!
//! For every applicable rule and every `given` selector, matched nodes are
//! turned into lint targets according to each `then.field`, the bound
//! function runs against each target, and one `LintResult` is produced per
//! (target, then-clause) pair. Rules run in parallel with `rayon`; results
//! are reassembled in ruleset order so output stays deterministic.

use crate::document::Document;
use crate::error::{Error, RuleError};
use crate::message::MessageContext;
use crate::path::{field_to_segments, lookup, to_bracket_string};
use crate::ruleset::format::applies;
use crate::ruleset::{Rule, Ruleset, Severity};
use crate::selector::{JsonPathSelector, Selector};
use crate::target::{render_value, LintTarget};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value as Json;
use tracing::{debug, warn};

/// Pseudo-field selecting the keys (or indices) of the matched node.
pub const KEY_FIELD: &str = "@key";

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Outcome of one function run against one target.
pub struct LintResult {
    pub passed: bool,
    /// Absolute bracket path, e.g. `[info][title]`.
    pub path: String,
    pub rule: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
/// Every result of an evaluation plus the rules that stopped on a defect.
pub struct LintReport {
    pub results: Vec<LintResult>,
    #[serde(rename = "ruleErrors")]
    pub rule_errors: Vec<RuleError>,
}

impl LintReport {
    /// Failing results only.
    pub fn diagnostics(&self) -> impl Iterator<Item = &LintResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics().filter(|r| r.severity == severity).count()
    }
}

/// Evaluate `ruleset` against `document` with the default selector engine.
pub fn lint(document: &Document, ruleset: &Ruleset) -> Result<LintReport, Error> {
    lint_with(document, ruleset, &JsonPathSelector)
}

pub fn lint_with(
    document: &Document,
    ruleset: &Ruleset,
    selector: &dyn Selector,
) -> Result<LintReport, Error> {
    if let Some(msg) = ruleset.initialization_error() {
        return Err(Error::RulesetNotInitialized(msg.to_string()));
    }

    let per_rule: Vec<(Vec<LintResult>, Option<RuleError>)> = ruleset
        .rules
        .par_iter()
        .filter(|rule| rule.severity != Severity::Off && rule_applies(rule, ruleset, document))
        .map(|rule| evaluate_rule(rule, document, selector))
        .collect();

    let mut report = LintReport::default();
    for (results, error) in per_rule {
        report.results.extend(results);
        if let Some(e) = error {
            report.rule_errors.push(e);
        }
    }
    Ok(report)
}

/// Rule formats first, then ruleset formats; empty means unconstrained.
fn rule_applies(rule: &Rule, ruleset: &Ruleset, document: &Document) -> bool {
    if !rule.formats.is_empty() {
        applies(&rule.formats, document.formats())
    } else {
        applies(&ruleset.formats, document.formats())
    }
}

fn evaluate_rule(
    rule: &Rule,
    document: &Document,
    selector: &dyn Selector,
) -> (Vec<LintResult>, Option<RuleError>) {
    let mut results = Vec::new();
    for given in &rule.given {
        let paths = match selector.select(given, &document.root) {
            Ok(p) => p,
            Err(e) => {
                debug!(rule = %rule.name, selector = %given, error = %e, "selector skipped");
                continue;
            }
        };
        debug!(rule = %rule.name, selector = %given, matches = paths.len(), "selector evaluated");

        for path in paths {
            let Some(node) = lookup(&document.root, &path) else {
                continue;
            };
            for then in &rule.then {
                for target in derive_targets(node, &path, then.field.as_deref(), selector) {
                    match then.function.execute(&target) {
                        Ok(res) => results.push(LintResult {
                            passed: res.passed,
                            path: target.path_string(),
                            rule: rule.name.clone(),
                            severity: rule.severity,
                            message: build_message(rule, &target, res.message.as_deref()),
                        }),
                        Err(e) => {
                            warn!(rule = %rule.name, error = %e, "rule evaluation stopped");
                            return (
                                results,
                                Some(RuleError {
                                    rule: rule.name.clone(),
                                    message: e.to_string(),
                                }),
                            );
                        }
                    }
                }
            }
        }
    }
    (results, None)
}

fn join(base: &[String], rest: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out = base.to_vec();
    out.extend(rest);
    out
}

/// Derive lint targets from a matched node and a `then.field`.
pub fn derive_targets<'a>(
    node: &'a Json,
    base: &[String],
    field: Option<&str>,
    selector: &dyn Selector,
) -> Vec<LintTarget<'a>> {
    let Some(field) = field else {
        return vec![LintTarget::borrowed(base.to_vec(), node)];
    };
    if !node.is_object() && !node.is_array() {
        return vec![LintTarget::borrowed(base.to_vec(), node)];
    }

    if field == KEY_FIELD {
        return match node {
            Json::Object(map) => map
                .keys()
                .map(|k| LintTarget::owned(join(base, [k.clone()]), Json::String(k.clone())))
                .collect(),
            Json::Array(items) => (0..items.len())
                .map(|i| LintTarget::owned(join(base, [i.to_string()]), Json::String(i.to_string())))
                .collect(),
            _ => Vec::new(),
        };
    }

    if field.starts_with('$') {
        return match selector.select(field, node) {
            Ok(paths) => paths
                .into_iter()
                .filter_map(|rel| {
                    let value = lookup(node, &rel)?;
                    Some(LintTarget::borrowed(join(base, rel), value))
                })
                .collect(),
            Err(e) => {
                debug!(field = %field, error = %e, "field selector skipped");
                Vec::new()
            }
        };
    }

    let segments = field_to_segments(field);
    match lookup(node, &segments) {
        Some(value) => vec![LintTarget::borrowed(join(base, segments), value)],
        None => vec![LintTarget::owned(join(base, segments), Json::Null)],
    }
}

fn build_message(rule: &Rule, target: &LintTarget<'_>, function_message: Option<&str>) -> String {
    match &rule.message {
        Some(template) => {
            let path = to_bracket_string(&target.path);
            let value = render_value(target.value());
            MessageContext {
                description: rule.description.as_deref(),
                error: function_message,
                property: target.property(),
                path: Some(&path),
                value: Some(&value),
            }
            .render(template)
        }
        None => function_message.unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(ruleset: Json, document: Json) -> LintReport {
        let rs = Ruleset::from_value(&ruleset);
        assert!(rs.is_initialized(), "{:?}", rs.initialization_error());
        lint(&Document::new(document), &rs).unwrap()
    }

    #[test]
    fn test_info_title_truthy() {
        let report = run(
            json!({"rules": {"info-title": {
                "given": "$.info",
                "severity": "error",
                "then": {"field": "title", "function": "truthy"}
            }}}),
            json!({"info": {"title": ""}}),
        );
        let diags: Vec<&LintResult> = report.diagnostics().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, "info-title");
        assert_eq!(diags[0].path, "[info][title]");
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].message, "'title' must be truthy");
    }

    #[test]
    fn test_absent_field_is_null_target() {
        let report = run(
            json!({"rules": {"contact": {
                "given": "$.info",
                "then": {"field": "contact.email", "function": "defined"}
            }}}),
            json!({"info": {"title": "x"}}),
        );
        let diags: Vec<&LintResult> = report.diagnostics().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path, "[info][contact][email]");
    }

    #[test]
    fn test_key_field_targets_keys() {
        let node = json!({"400": {}, "200": {}});
        let targets = derive_targets(
            &node,
            &["responses".to_string()],
            Some(KEY_FIELD),
            &JsonPathSelector,
        );
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].path, vec!["responses", "400"]);
        assert_eq!(targets[0].value(), &json!("400"));
        assert_eq!(targets[1].value(), &json!("200"));

        let list = json!(["a", "b"]);
        let targets = derive_targets(&list, &[], Some(KEY_FIELD), &JsonPathSelector);
        assert_eq!(targets[1].path, vec!["1"]);
        assert_eq!(targets[1].value(), &json!("1"));
    }

    #[test]
    fn test_key_field_with_casing_checks_names() {
        let report = run(
            json!({"rules": {"paths-kebab": {
                "given": "$.components.schemas",
                "then": {"field": "@key", "function": "casing", "functionOptions": {"type": "pascal"}}
            }}}),
            json!({"components": {"schemas": {"Pet": {}, "pet_owner": {}}}}),
        );
        let diags: Vec<&LintResult> = report.diagnostics().collect();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path, "[components][schemas][pet_owner]");
    }

    #[test]
    fn test_unsorted_map_fails_alphabetical() {
        let report = run(
            json!({"rules": {"sorted": {
                "given": "$.responses",
                "then": {"function": "alphabetical"}
            }}}),
            json!({"responses": {"400": {}, "200": {}}}),
        );
        assert_eq!(report.diagnostics().count(), 1);
    }

    #[test]
    fn test_nested_selector_field() {
        let report = run(
            json!({"rules": {"op-ids": {
                "given": "$.paths[*]",
                "then": {"field": "$.*.operationId", "function": "truthy"}
            }}}),
            json!({"paths": {"/a": {"get": {"operationId": ""}, "put": {}}}}),
        );
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].path, "[paths][/a][get][operationId]");
        assert!(!report.results[0].passed);
    }

    #[test]
    fn test_message_template_and_scalar_node() {
        let report = run(
            json!({"rules": {"title-len": {
                "description": "Titles are short",
                "message": "{{description}}: {{property}} at {{path}} is '{{value}}' ({{error}})",
                "given": "$.info.title",
                "then": {"field": "ignored", "function": "length", "functionOptions": {"max": 3}}
            }}}),
            json!({"info": {"title": "long title"}}),
        );
        let diag = report.diagnostics().next().unwrap();
        assert_eq!(
            diag.message,
            "Titles are short: title at [info][title] is 'long title' ('title' must not be longer than 3)"
        );
    }

    #[test]
    fn test_format_filtering() {
        let ruleset = json!({"rules": {
            "oas2-only": {"given": "$", "formats": ["oas2"], "then": {"field": "x", "function": "defined"}},
            "any": {"given": "$", "then": {"field": "x", "function": "defined"}}
        }});
        let report = run(ruleset.clone(), json!({"openapi": "3.1.0"}));
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].rule, "any");
        let report = run(ruleset, json!({"swagger": "2.0"}));
        assert_eq!(report.results.len(), 2);

        let scoped = json!({"formats": ["oas3"], "rules": {
            "r": {"given": "$", "then": {"function": "truthy"}}
        }});
        assert!(run(scoped.clone(), json!({"swagger": "2.0"})).results.is_empty());
        assert_eq!(run(scoped, json!({"openapi": "3.0.0"})).results.len(), 1);
    }

    #[test]
    fn test_invalid_options_isolated_to_rule() {
        let report = run(
            json!({"rules": {
                "broken": {"given": "$", "then": {"function": "casing", "functionOptions": {}}},
                "fine": {"given": "$.info", "then": {"field": "title", "function": "truthy"}}
            }}),
            json!({"info": {"title": ""}}),
        );
        assert_eq!(report.rule_errors.len(), 1);
        assert_eq!(report.rule_errors[0].rule, "broken");
        assert_eq!(report.diagnostics().count(), 1);
    }

    #[test]
    fn test_off_rules_and_unsupported_selectors_are_skipped() {
        let report = run(
            json!({"rules": {
                "off": {"given": "$", "severity": "off", "then": {"field": "x", "function": "defined"}},
                "weird": {"given": "$.paths[*]~", "then": {"function": "truthy"}}
            }}),
            json!({"paths": {"/a": {}}}),
        );
        assert!(report.results.is_empty());
        assert!(report.rule_errors.is_empty());
    }

    #[test]
    fn test_uninitialized_ruleset_is_refused() {
        let rs = Ruleset::from_value(&json!({"rules": {"r": {"given": "#X", "then": {"function": "truthy"}}}}));
        match lint(&Document::new(json!({})), &rs) {
            Err(Error::RulesetNotInitialized(msg)) => assert_eq!(msg, "r: Alias #X not found"),
            other => panic!("unexpected: {:?}", other.map(|r| r.results.len())),
        }
    }
}
