//! A parsed document together with its inferred formats.

use crate::content;
use crate::error::Error;
use crate::ruleset::format::{infer_formats, Format};
use serde_json::Value as Json;

#[derive(Debug, Clone)]
pub struct Document {
    pub root: Json,
    /// `None` when the document is format-unaware (non-map root).
    pub formats: Option<Vec<Format>>,
}

impl Document {
    pub fn new(root: Json) -> Self {
        let formats = infer_formats(&root);
        Self { root, formats }
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(Self::new(content::parse(text)?))
    }

    pub fn formats(&self) -> Option<&[Format]> {
        self.formats.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_infers_formats() {
        let doc = Document::parse("openapi: 3.0.1\ninfo:\n  title: x\n").unwrap();
        assert_eq!(doc.formats(), Some(&[Format::Oas3_0, Format::Oas3][..]));
        let doc = Document::parse("[1, 2]").unwrap();
        assert_eq!(doc.formats(), None);
    }
}
