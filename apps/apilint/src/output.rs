//! Output rendering for the lint, ruleset and functions commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is built by
//! pure `compose_*_json` functions so its shape can be tested directly.

use crate::functions::FUNCTION_NAMES;
use crate::models::Report;
use crate::validator::RulesetValidation;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", error_prefix(), e),
    }
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

fn severity_tag(severity: &str, color: bool) -> String {
    let tag = format!("⟦{}⟧", severity);
    if !color {
        return tag;
    }
    match severity {
        "error" => tag.red().bold().to_string(),
        "warn" => tag.yellow().bold().to_string(),
        "info" => tag.blue().bold().to_string(),
        _ => tag.bright_black().bold().to_string(),
    }
}

fn severity_icon(severity: &str, color: bool) -> String {
    let icon = match severity {
        "error" => "✖",
        "warn" => "▲",
        "info" => "◆",
        _ => "·",
    };
    if !color {
        return icon.to_string();
    }
    match severity {
        "error" => icon.red().to_string(),
        "warn" => icon.yellow().to_string(),
        "info" => icon.blue().to_string(),
        _ => icon.bright_black().to_string(),
    }
}

/// Print lint results in the requested format.
pub fn print_lint(report: &Report, output: &str) {
    if output == "json" {
        print_json(&compose_lint_json(report));
        return;
    }
    let color = use_colors(output);
    for is in &report.issues {
        let file = if color {
            is.file.clone().bold().to_string()
        } else {
            is.file.clone()
        };
        let at = if is.path.is_empty() { "$" } else { is.path.as_str() };
        println!(
            "{} {} {} {} ❲{}❳ {}",
            severity_icon(&is.severity, color),
            severity_tag(&is.severity, color),
            file,
            at,
            is.rule,
            is.message
        );
    }
    for e in &report.rule_errors {
        let tag = if color {
            "⟦rule error⟧".magenta().bold().to_string()
        } else {
            "⟦rule error⟧".to_string()
        };
        println!("{} {} ❲{}❳ {}", tag, e.file, e.rule, e.message);
    }
    let s = &report.summary;
    let summary = format!(
        "Summary: errors={} warnings={} infos={} hints={} ruleErrors={} files={}",
        s.errors,
        s.warnings,
        s.infos,
        s.hints,
        report.rule_errors.len(),
        s.files
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Print the outcome of a structural ruleset check.
pub fn print_ruleset_validation(res: &RulesetValidation, output: &str) {
    if output == "json" {
        print_json(&compose_ruleset_json(res));
        return;
    }
    let color = use_colors(output);
    if res.passed {
        if color {
            println!("{} ruleset is valid", "✔".green());
        } else {
            println!("✔ ruleset is valid");
        }
        return;
    }
    for e in &res.errors {
        let icon = if color {
            "✖".red().to_string()
        } else {
            "✖".to_string()
        };
        let location = if e.location.is_empty() {
            "ruleset"
        } else {
            e.location.as_str()
        };
        println!("{} {}: {}", icon, location, e.message);
    }
    let summary = format!("Summary: errors={}", res.errors.len());
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Print the built-in function names, one per line.
pub fn print_functions(output: &str) {
    if output == "json" {
        print_json(&json!({ "functions": FUNCTION_NAMES }));
        return;
    }
    for name in FUNCTION_NAMES {
        println!("{}", name);
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}

/// Compose ruleset validation JSON object (pure).
pub fn compose_ruleset_json(res: &RulesetValidation) -> JsonVal {
    let errors: Vec<_> = res
        .errors
        .iter()
        .map(|e| json!({"location": e.location, "message": e.message}))
        .collect();
    json!({"passed": res.passed, "errors": errors})
}
