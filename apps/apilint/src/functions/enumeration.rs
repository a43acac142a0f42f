use super::{subject, FunctionResult, LintFunction, Options};
use crate::target::{render_value, LintTarget};
use serde_json::Value as Json;

/// Scalar values must be one of `values`.
pub struct Enumeration {
    values: Vec<String>,
    errors: Vec<String>,
}

impl Enumeration {
    pub fn new(options: &Options) -> Self {
        let mut errors = Vec::new();
        let mut values = Vec::new();
        match options.get("values") {
            None => errors.push("Enumeration function requires the set of values.".into()),
            Some(Json::Array(items)) if items.iter().all(Json::is_string) => {
                values = items.iter().map(render_value).collect()
            }
            Some(_) => {
                errors.push("Enumeration function values should be a list of strings.".into())
            }
        }
        for key in options.keys().filter(|k| k.as_str() != "values") {
            errors.push(format!("Unknown option for the enumeration function: {key}"));
        }
        Self { values, errors }
    }
}

impl LintFunction for Enumeration {
    fn name(&self) -> &'static str {
        "enumeration"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let value = match target.value() {
            Json::Null | Json::Array(_) | Json::Object(_) => return FunctionResult::pass(),
            other => render_value(other),
        };
        if self.values.contains(&value) {
            FunctionResult::pass()
        } else {
            FunctionResult::fail(format!(
                "{} must be one of the allowed values: {}",
                subject(target),
                self.values.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_membership_with_string_coercion() {
        let f = Enumeration::new(json!({"values": ["a", "b", "200"]}).as_object().unwrap());
        let passes = |v: Json| f.execute(&LintTarget::owned(vec![], v)).unwrap().passed;
        assert!(passes(json!("a")));
        assert!(passes(json!(200)));
        assert!(!passes(json!("c")));
        assert!(passes(json!(null)));
    }

    #[test]
    fn test_values_required() {
        let f = Enumeration::new(&Options::new());
        assert_eq!(
            f.validate_options(),
            vec!["Enumeration function requires the set of values.".to_string()]
        );
        for bad in [json!({"values": [1, {}]}), json!({"values": "a"})] {
            let f = Enumeration::new(bad.as_object().unwrap());
            assert_eq!(
                f.validate_options(),
                vec!["Enumeration function values should be a list of strings.".to_string()]
            );
        }
    }
}
