use super::{subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use serde_json::Value as Json;

/// String length or collection size must lie within `min..=max`.
pub struct Length {
    min: Option<i64>,
    max: Option<i64>,
    errors: Vec<String>,
}

impl Length {
    pub fn new(options: &Options) -> Self {
        let mut errors = Vec::new();
        if !options.contains_key("min") && !options.contains_key("max") {
            errors.push("Length function requires at least a min or a max value.".into());
        }
        let mut bound = |key: &str| match options.get(key) {
            None => None,
            Some(v) => match v.as_i64() {
                Some(n) => Some(n),
                None => {
                    errors.push(format!("Length function {key} value should be an integer."));
                    None
                }
            },
        };
        let min = bound("min");
        let max = bound("max");
        Self { min, max, errors }
    }
}

impl LintFunction for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let len = match target.value() {
            Json::String(s) => s.chars().count(),
            Json::Array(items) => items.len(),
            Json::Object(map) => map.len(),
            _ => return FunctionResult::pass(),
        } as i64;
        if let Some(min) = self.min {
            if len < min {
                return FunctionResult::fail(format!(
                    "{} must not be shorter than {min}",
                    subject(target)
                ));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return FunctionResult::fail(format!(
                    "{} must not be longer than {max}",
                    subject(target)
                ));
            }
        }
        FunctionResult::pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_min_max_bounds() {
        let f = Length::new(json!({"min": 2, "max": 4}).as_object().unwrap());
        let passes = |v: Json| f.execute(&LintTarget::owned(vec![], v)).unwrap().passed;
        assert!(passes(json!("123")));
        assert!(!passes(json!("1")));
        assert!(!passes(json!("12345")));
        assert!(passes(json!([1, 2, 3])));
        assert!(!passes(json!({"a": 1})));
        assert!(passes(json!(true)));
    }

    #[test]
    fn test_option_errors() {
        let f = Length::new(&Options::new());
        assert_eq!(
            f.validate_options(),
            vec!["Length function requires at least a min or a max value.".to_string()]
        );
        let f = Length::new(json!({"min": "2", "max": 1.5}).as_object().unwrap());
        assert_eq!(
            f.validate_options(),
            vec![
                "Length function min value should be an integer.".to_string(),
                "Length function max value should be an integer.".to_string(),
            ]
        );
    }
}
