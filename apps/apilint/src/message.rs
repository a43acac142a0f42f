//! Message templates and their `{{placeholder}}` substitution.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder names accepted in rule messages.
pub const PLACEHOLDERS: [&str; 5] = ["description", "error", "property", "path", "value"];

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").expect("valid placeholder regex"));

/// Every `{{...}}` occurrence in `template`, including unknown names.
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER.find_iter(template).map(|m| m.as_str()).collect()
}

/// Whether a `{{...}}` occurrence names a known placeholder.
pub fn is_known(placeholder: &str) -> bool {
    placeholder
        .strip_prefix("{{")
        .and_then(|p| p.strip_suffix("}}"))
        .map(|name| PLACEHOLDERS.contains(&name))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default)]
/// Values available to a message template.
pub struct MessageContext<'a> {
    pub description: Option<&'a str>,
    pub error: Option<&'a str>,
    pub property: Option<&'a str>,
    pub path: Option<&'a str>,
    pub value: Option<&'a str>,
}

impl MessageContext<'_> {
    /// Substitute known placeholders; those without a value stay as written.
    pub fn render(&self, template: &str) -> String {
        let pairs = [
            ("{{description}}", self.description),
            ("{{error}}", self.error),
            ("{{property}}", self.property),
            ("{{path}}", self.path),
            ("{{value}}", self.value),
        ];
        let mut out = template.to_string();
        for (key, value) in pairs {
            if let Some(v) = value {
                out = out.replace(key, v);
            }
        }
        out
    }
}
