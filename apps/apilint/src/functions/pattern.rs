use super::{subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;
use fancy_regex::Regex;
use serde_json::Value as Json;

const ALLOWED_FLAGS: &str = "iumsdgy";

/// Full match; a pattern that exceeds the backtracking limit counts as no match.
fn full_match(re: &Regex, value: &str) -> bool {
    re.is_match(value).unwrap_or_else(|e| {
        tracing::debug!(pattern = %re.as_str(), error = %e, "pattern evaluation gave up");
        false
    })
}

/// String values must fully match `match` and must not fully match `notMatch`.
pub struct Pattern {
    matches: Option<(String, Regex)>,
    not_matches: Option<(String, Regex)>,
    errors: Vec<String>,
}

impl Pattern {
    pub fn new(options: &Options) -> Self {
        let mut errors = Vec::new();
        if !options.contains_key("match") && !options.contains_key("notMatch") {
            errors.push("Pattern function requires either match or notMatch options".into());
        }
        let matches = compile_option(options, "match", &mut errors);
        let not_matches = compile_option(options, "notMatch", &mut errors);
        Self {
            matches,
            not_matches,
            errors,
        }
    }
}

/// Split `/pattern/flags` into its parts; plain text has no flags.
fn split_delimited(raw: &str) -> (&str, &str) {
    if let Some(rest) = raw.strip_prefix('/') {
        if let Some(idx) = rest.rfind('/') {
            return (&rest[..idx], &rest[idx + 1..]);
        }
    }
    (raw, "")
}

fn compile_option(
    options: &Options,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<(String, Regex)> {
    let raw = match options.get(key)? {
        Json::String(s) => s,
        _ => {
            errors.push(format!("Pattern function {key} option must be a string."));
            return None;
        }
    };
    let (pattern, flags) = split_delimited(raw);
    if flags.chars().any(|c| !ALLOWED_FLAGS.contains(c)) {
        errors.push(format!("Pattern function {key} option contains invalid flags."));
        return None;
    }
    let inline: String = flags.chars().filter(|c| "ims".contains(*c)).collect();
    let full = if inline.is_empty() {
        format!(r"\A(?:{pattern})\z")
    } else {
        format!(r"(?{inline})\A(?:{pattern})\z")
    };
    match Regex::new(&full) {
        Ok(re) => Some((pattern.to_string(), re)),
        Err(_) => {
            errors.push(format!(
                "Pattern function {key} option is not a valid regex pattern."
            ));
            None
        }
    }
}

impl LintFunction for Pattern {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        let s = match target.value() {
            Json::Null => {
                return FunctionResult::fail(format!("{} must be a string", subject(target)))
            }
            Json::String(s) => s,
            _ => return FunctionResult::pass(),
        };
        if let Some((raw, re)) = &self.matches {
            if !full_match(re, s) {
                return FunctionResult::fail(format!(
                    "{} must match the pattern '{raw}'",
                    subject(target)
                ));
            }
        }
        if let Some((raw, re)) = &self.not_matches {
            if full_match(re, s) {
                return FunctionResult::fail(format!(
                    "{} must not match the pattern '{raw}'",
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

    fn check(options: Json, value: Json) -> FunctionResult {
        let f = Pattern::new(options.as_object().unwrap());
        f.execute(&LintTarget::owned(vec!["name".into()], value)).unwrap()
    }

    #[test]
    fn test_match_is_full_match() {
        let opts = json!({"match": "[a-z]+"});
        assert!(check(opts.clone(), json!("abc")).passed);
        let res = check(opts.clone(), json!("abc1"));
        assert!(!res.passed);
        assert_eq!(res.message.as_deref(), Some("'name' must match the pattern '[a-z]+'"));
        assert!(!check(opts.clone(), json!(null)).passed);
        assert!(check(opts, json!(12)).passed);
    }

    #[test]
    fn test_delimited_flags() {
        assert!(check(json!({"match": "/^abc$/i"}), json!("ABC")).passed);
        assert!(!check(json!({"match": "/^abc$/"}), json!("ABC")).passed);
        let f = Pattern::new(json!({"match": "/abc/x"}).as_object().unwrap());
        assert_eq!(
            f.validate_options(),
            vec!["Pattern function match option contains invalid flags.".to_string()]
        );
    }

    #[test]
    fn test_match_and_not_match_combined() {
        let opts = json!({"match": "[a-z]+", "notMatch": "admin"});
        assert!(check(opts.clone(), json!("user")).passed);
        assert!(!check(opts.clone(), json!("admin")).passed);
        assert!(!check(opts, json!("User")).passed);
    }

    #[test]
    fn test_lookaround_patterns() {
        let opts = json!({"match": "^(?!.*\\/$).*$"});
        assert!(Pattern::new(opts.as_object().unwrap()).validate_options().is_empty());
        assert!(check(opts.clone(), json!("/pets")).passed);
        assert!(!check(opts, json!("/pets/")).passed);

        let opts = json!({"notMatch": "/.*(?<=-)internal/i"});
        assert!(!check(opts.clone(), json!("X-Internal")).passed);
        assert!(check(opts, json!("internal")).passed);
    }

    #[test]
    fn test_option_errors() {
        let f = Pattern::new(&Options::new());
        assert_eq!(
            f.validate_options(),
            vec!["Pattern function requires either match or notMatch options".to_string()]
        );
        let f = Pattern::new(json!({"notMatch": "("}).as_object().unwrap());
        assert_eq!(
            f.validate_options(),
            vec!["Pattern function notMatch option is not a valid regex pattern.".to_string()]
        );
        let f = Pattern::new(json!({"match": 3}).as_object().unwrap());
        assert_eq!(
            f.validate_options(),
            vec!["Pattern function match option must be a string.".to_string()]
        );
    }
}
