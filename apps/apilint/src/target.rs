//! Lint targets: a concrete (path, value) pair handed to a lint function.

use crate::path::to_bracket_string;
use serde_json::Value as Json;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub struct LintTarget<'a> {
    /// Absolute path from the document root.
    pub path: Vec<String>,
    /// `Null` stands for an absent node.
    pub value: Cow<'a, Json>,
}

impl<'a> LintTarget<'a> {
    pub fn borrowed(path: Vec<String>, value: &'a Json) -> Self {
        Self {
            path,
            value: Cow::Borrowed(value),
        }
    }

    pub fn owned(path: Vec<String>, value: Json) -> Self {
        Self {
            path,
            value: Cow::Owned(value),
        }
    }

    /// Last path segment, used as the `{{property}}` of messages.
    pub fn property(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    pub fn path_string(&self) -> String {
        to_bracket_string(&self.path)
    }

    pub fn value(&self) -> &Json {
        &self.value
    }
}

/// Render a value for messages: strings verbatim, everything else as compact JSON.
pub fn render_value(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
