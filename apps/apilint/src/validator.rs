//! Entry points taking raw document and ruleset text.

use crate::content;
use crate::document::Document;
use crate::error::{Error, RulesetValidationError, RulesetValidationErrors};
use crate::lint::{lint_with, LintReport};
use crate::ruleset::validate::validate_ruleset_value;
use crate::ruleset::Ruleset;
use crate::selector::JsonPathSelector;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
/// Result of a ruleset-only validation.
pub struct RulesetValidation {
    pub passed: bool,
    pub errors: Vec<RulesetValidationError>,
}

/// Structurally validate ruleset text without touching any document.
pub fn validate_ruleset(ruleset_text: &str) -> Result<RulesetValidation, Error> {
    let raw = content::parse(ruleset_text)?;
    let errors = validate_ruleset_value(&raw, &JsonPathSelector);
    Ok(RulesetValidation {
        passed: errors.is_empty(),
        errors,
    })
}

/// Parse and validate a ruleset, returning the built model.
pub fn load_ruleset(ruleset_text: &str) -> Result<Ruleset, Error> {
    let raw = content::parse(ruleset_text)?;
    let errors = validate_ruleset_value(&raw, &JsonPathSelector);
    if !errors.is_empty() {
        return Err(Error::InvalidRuleset(RulesetValidationErrors(errors)));
    }
    let ruleset = Ruleset::from_value(&raw);
    if let Some(msg) = ruleset.initialization_error() {
        return Err(Error::RulesetNotInitialized(msg.to_string()));
    }
    Ok(ruleset)
}

/// Lint `document_text` against `ruleset_text`.
///
/// A structurally invalid ruleset is rejected before the document is parsed.
pub fn validate_document(document_text: &str, ruleset_text: &str) -> Result<LintReport, Error> {
    let ruleset = load_ruleset(ruleset_text)?;
    let document = Document::parse(document_text)?;
    lint_with(&document, &ruleset, &JsonPathSelector)
}
