//! Selector engine seam.
//!
//! The evaluation engine only needs "every path matching this expression";
//! `JsonPathSelector` provides it on top of `serde_json_path` (RFC 9535).

use serde_json::Value as Json;
use serde_json_path::{JsonPath, PathElement};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector must start with '$': {0}")]
    MissingRoot(String),
    #[error("unsupported selector '{expression}': {reason}")]
    Unsupported { expression: String, reason: String },
}

/// Evaluates selector expressions against a generic tree.
pub trait Selector: Send + Sync {
    /// Paths (as segment lists) of every node matching `expression`, in match order.
    fn select(&self, expression: &str, root: &Json) -> Result<Vec<Vec<String>>, SelectorError>;

    /// Syntax check without evaluating.
    fn check(&self, expression: &str) -> Result<(), SelectorError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPathSelector;

impl JsonPathSelector {
    fn compile(&self, expression: &str) -> Result<JsonPath, SelectorError> {
        if !expression.starts_with('$') {
            return Err(SelectorError::MissingRoot(expression.to_string()));
        }
        JsonPath::parse(expression).map_err(|e| SelectorError::Unsupported {
            expression: expression.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Selector for JsonPathSelector {
    fn select(&self, expression: &str, root: &Json) -> Result<Vec<Vec<String>>, SelectorError> {
        let path = self.compile(expression)?;
        let located = path.query_located(root);
        Ok(located
            .iter()
            .map(|node| {
                node.location()
                    .iter()
                    .map(|el| match el {
                        PathElement::Name(name) => name.to_string(),
                        PathElement::Index(i) => i.to_string(),
                    })
                    .collect()
            })
            .collect())
    }

    fn check(&self, expression: &str) -> Result<(), SelectorError> {
        self.compile(expression).map(|_| ())
    }
}
