use super::{FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use serde_json::Value as Json;

/// Exactly one of `properties` must be present on an object.
pub struct Xor {
    properties: Vec<String>,
    errors: Vec<String>,
}

impl Xor {
    pub fn new(options: &Options) -> Self {
        Self {
            properties: options
                .get("properties")
                .and_then(Json::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|i| i.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            errors: validate(options),
        }
    }
}

fn validate(options: &Options) -> Vec<String> {
    let Some(Json::Array(properties)) = options.get("properties") else {
        return vec!["Xor function requires the list of properties.".into()];
    };
    if properties.iter().any(|p| !p.is_string()) {
        return vec!["Xor function properties requires a list of Strings.".into()];
    }
    if properties.len() <= 1 {
        return vec!["Xor functions requires more than 1 property.".into()];
    }
    options
        .keys()
        .filter(|k| k.as_str() != "properties")
        .map(|k| format!("Unknown option for the Xor function: {k}"))
        .collect()
}

impl LintFunction for Xor {
    fn name(&self) -> &'static str {
        "xor"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let Json::Object(map) = target.value() else {
            return FunctionResult::pass_with("Xor function can only be applied to objects");
        };
        let present = self
            .properties
            .iter()
            .filter(|p| map.contains_key(p.as_str()))
            .count();
        if present == 1 {
            FunctionResult::pass()
        } else {
            FunctionResult::fail(format!(
                "Only one of the properties [{}] should be present",
                self.properties.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exactly_one_property() {
        let f = Xor::new(json!({"properties": ["version", "title"]}).as_object().unwrap());
        let run = |v: Json| f.execute(&LintTarget::owned(vec![], v)).unwrap();
        assert!(!run(json!({"version": "1", "title": "t"})).passed);
        assert!(run(json!({"title": "t"})).passed);
        let res = run(json!({"other": 1}));
        assert!(!res.passed);
        assert_eq!(
            res.message.as_deref(),
            Some("Only one of the properties [version, title] should be present")
        );
        let res = run(json!("scalar"));
        assert!(res.passed);
        assert_eq!(
            res.message.as_deref(),
            Some("Xor function can only be applied to objects")
        );
    }

    #[test]
    fn test_option_errors() {
        let f = Xor::new(json!({"properties": ["only"]}).as_object().unwrap());
        assert_eq!(
            f.validate_options(),
            vec!["Xor functions requires more than 1 property.".to_string()]
        );
        let f = Xor::new(json!({"properties": ["a", "b"], "x": 1}).as_object().unwrap());
        assert_eq!(
            f.validate_options(),
            vec!["Unknown option for the Xor function: x".to_string()]
        );
        let f = Xor::new(&Options::new());
        assert_eq!(
            f.validate_options(),
            vec!["Xor function requires the list of properties.".to_string()]
        );
    }
}
