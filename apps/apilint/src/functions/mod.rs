//! Lint function framework and the built-in functions.
//!
//! A function is bound to its options once, when the ruleset is built.
//! `validate_options` depends on the bound options only, and `execute`
//! refuses to look at a target while those options are invalid.
//!
//! Built-ins:
//! - `truthy` / `falsy`
//! - `defined` / `undefined`
//! - `alphabetical`, `casing`, `pattern`, `length`, `enumeration`, `xor`
//! - `schema` (JSON Schema via the `jsonschema` crate)

mod alphabetical;
mod casing;
mod defined;
mod enumeration;
mod length;
mod pattern;
mod schema;
mod truthy;
mod xor;

pub use alphabetical::Alphabetical;
pub use casing::Casing;
pub use defined::{Defined, Undefined};
pub use enumeration::Enumeration;
pub use length::Length;
pub use pattern::Pattern;
pub use schema::Schema;
pub use truthy::{Falsy, Truthy};
pub use xor::Xor;

use crate::error::RulesetError;
use crate::target::LintTarget;
use serde_json::{Map, Value as Json};

/// Function options as authored under `functionOptions`.
pub type Options = Map<String, Json>;

/// Names of every registered built-in.
pub const FUNCTION_NAMES: &[&str] = &[
    "alphabetical",
    "casing",
    "defined",
    "enumeration",
    "falsy",
    "length",
    "pattern",
    "schema",
    "truthy",
    "undefined",
    "xor",
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of one function execution against one target.
pub struct FunctionResult {
    pub passed: bool,
    pub message: Option<String>,
}

impl FunctionResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    pub fn pass_with(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: Some(message.into()),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
        }
    }
}

pub trait LintFunction: Send + Sync {
    fn name(&self) -> &'static str;

    /// Problems with the bound options; empty when they are usable.
    fn validate_options(&self) -> Vec<String>;

    /// Evaluate a target, assuming valid options.
    fn run(&self, target: &LintTarget<'_>) -> FunctionResult;

    fn execute(&self, target: &LintTarget<'_>) -> Result<FunctionResult, RulesetError> {
        let errors = self.validate_options();
        if !errors.is_empty() {
            return Err(RulesetError::InvalidOptions {
                function: self.name().to_string(),
                errors,
            });
        }
        Ok(self.run(target))
    }
}

/// Whether `name` is a registered built-in (case-insensitive).
pub fn is_function(name: &str) -> bool {
    FUNCTION_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Bind the built-in called `name` to `options`.
pub fn build_function(
    name: &str,
    options: Option<&Options>,
) -> Result<Box<dyn LintFunction>, RulesetError> {
    let empty = Options::new();
    let opts = options.unwrap_or(&empty);
    let f: Box<dyn LintFunction> = match name.to_ascii_lowercase().as_str() {
        "truthy" => Box::new(Truthy::new(opts)),
        "falsy" => Box::new(Falsy::new(opts)),
        "defined" => Box::new(Defined::new(opts)),
        "undefined" => Box::new(Undefined::new(opts)),
        "alphabetical" => Box::new(Alphabetical::new(opts)),
        "casing" => Box::new(Casing::new(opts)),
        "pattern" => Box::new(Pattern::new(opts)),
        "length" => Box::new(Length::new(opts)),
        "enumeration" => Box::new(Enumeration::new(opts)),
        "xor" => Box::new(Xor::new(opts)),
        "schema" => Box::new(Schema::new(opts)),
        _ => return Err(RulesetError::UnknownFunction(name.to_string())),
    };
    Ok(f)
}

/// Option check shared by the functions that take no options.
fn no_options(display: &str, options: &Options) -> Vec<String> {
    if options.is_empty() {
        Vec::new()
    } else {
        vec![format!("{display} function does not accept any options.")]
    }
}

/// Subject of a message: the target's property name, or `value` at the root.
fn subject(target: &LintTarget<'_>) -> String {
    target
        .property()
        .map(|p| format!("'{p}'"))
        .unwrap_or_else(|| "value".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts(v: Json) -> Options {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_registry_covers_every_name() {
        for name in FUNCTION_NAMES {
            let f = build_function(name, None).unwrap();
            assert_eq!(f.name(), *name);
        }
        assert!(is_function("Truthy"));
        assert!(!is_function("nope"));
        assert_eq!(
            build_function("nope", None).err(),
            Some(RulesetError::UnknownFunction("nope".into()))
        );
    }

    #[test]
    fn test_execute_checks_options_before_target() {
        let f = build_function("truthy", Some(&opts(json!({"x": 1})))).unwrap();
        let target = LintTarget::owned(vec![], json!("anything"));
        match f.execute(&target) {
            Err(RulesetError::InvalidOptions { function, errors }) => {
                assert_eq!(function, "truthy");
                assert_eq!(errors, vec!["Truthy function does not accept any options."]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
