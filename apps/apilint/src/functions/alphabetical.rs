use super::{subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use serde_json::Value as Json;

const KEYED_BY: &str = "keyedBy";

/// Map keys or list entries must be in non-decreasing string order.
pub struct Alphabetical {
    keyed_by: Option<String>,
    errors: Vec<String>,
}

impl Alphabetical {
    pub fn new(options: &Options) -> Self {
        let mut keyed_by = None;
        let mut errors = Vec::new();
        for (key, value) in options {
            if key == KEYED_BY {
                match value {
                    Json::String(s) => keyed_by = Some(s.clone()),
                    _ => errors.push(format!("The value of '{KEYED_BY}' should be a string")),
                }
            } else {
                errors.push(format!("Unknown option '{key}' for alphabetical function."));
            }
        }
        Self { keyed_by, errors }
    }
}

/// Comparable text of a list entry; only strings and numbers qualify.
fn sort_key(value: &Json) -> Option<String> {
    match value {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_sorted<S: AsRef<str>>(items: &[S]) -> bool {
    items.windows(2).all(|w| w[0].as_ref() <= w[1].as_ref())
}

impl LintFunction for Alphabetical {
    fn name(&self) -> &'static str {
        "alphabetical"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let not_sorted = || FunctionResult::fail(format!("{} is not alphabetical", subject(target)));
        let keys: Vec<String> = match target.value() {
            Json::Object(map) => map.keys().cloned().collect(),
            Json::Array(items) => {
                let mut keys = Vec::with_capacity(items.len());
                for item in items {
                    let entry = match &self.keyed_by {
                        Some(field) => {
                            let Some(map) = item.as_object() else {
                                return FunctionResult::fail(format!(
                                    "{} is not a list of objects",
                                    subject(target)
                                ));
                            };
                            let Some(v) = map.get(field) else {
                                return FunctionResult::fail(format!(
                                    "{} has an entry without the key '{field}'",
                                    subject(target)
                                ));
                            };
                            v
                        }
                        None => item,
                    };
                    match sort_key(entry) {
                        Some(k) => keys.push(k),
                        None => {
                            return FunctionResult::fail(format!(
                                "{} is not a list of strings or numbers",
                                subject(target)
                            ))
                        }
                    }
                }
                keys
            }
            _ => return FunctionResult::pass(),
        };
        if is_sorted(&keys) {
            FunctionResult::pass()
        } else {
            not_sorted()
        }
    }
}
