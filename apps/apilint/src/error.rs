//! Error types for document loading, ruleset construction and evaluation.
//!
//! - `Error`: top-level failures surfaced to library callers and the CLI.
//! - `RulesetError`: authoring defects found while building or running rules.
//! - `RulesetValidationErrors`: collected structural problems of a ruleset.

use crate::content::ContentType;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
/// Top-level error returned by the validator entry points.
pub enum Error {
    /// The text could not be deserialized as the detected content type.
    #[error("failed to parse {content_type} content: {reason}")]
    Parse {
        content_type: ContentType,
        reason: String,
    },

    /// The text is neither a JSON nor a YAML document tree.
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// The ruleset failed structural validation.
    #[error("invalid ruleset: {0}")]
    InvalidRuleset(RulesetValidationErrors),

    /// The ruleset could not be built; it is never evaluated.
    #[error("ruleset is not initialized: {0}")]
    RulesetNotInitialized(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Ruleset authoring defects.
pub enum RulesetError {
    #[error("Alias #{0} not found")]
    UnknownAlias(String),

    #[error("Circular alias dependency detected.")]
    CircularAlias,

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A `then` clause bound options its function rejects.
    #[error("invalid options for function '{function}': {}", errors.join("; "))]
    InvalidOptions {
        function: String,
        errors: Vec<String>,
    },

    #[error("{location}: {message}")]
    Malformed { location: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One structural ruleset problem, attributed to a rule, alias or `ruleset`.
pub struct RulesetValidationError {
    pub location: String,
    pub message: String,
}

impl RulesetValidationError {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RulesetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Every structural problem of a ruleset, in discovery order.
pub struct RulesetValidationErrors(pub Vec<RulesetValidationError>);

impl RulesetValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RulesetValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for RulesetValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", msgs.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A rule whose evaluation stopped on an authoring defect.
pub struct RuleError {
    pub rule: String,
    pub message: String,
}
