//! Filter predicates handed to the document stores.
//!
//! A filter is a conjunction of exact string matches plus at most one free-text
//! constraint, which is a disjunction across several fields.

use serde_json::{Map, Value as JsonValue};

/// Case-insensitive substring match over any of `fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatch {
    pub needle: String,
    pub fields: Vec<String>,
}

impl TextMatch {
    fn matches(&self, doc: &Map<String, JsonValue>) -> bool {
        let needle = self.needle.to_lowercase();
        self.fields.iter().any(|field| match doc.get(field) {
            Some(JsonValue::String(s)) => s.to_lowercase().contains(&needle),
            // Array fields match when any string element matches.
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .any(|s| s.to_lowercase().contains(&needle)),
            _ => false,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    equals: Vec<(String, String)>,
    text: Option<TextMatch>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-match constraint on `field`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.equals.push((field.into(), value.into()));
        self
    }

    /// Like [`DocumentFilter::where_eq`], skipping absent and empty values.
    pub fn where_eq_opt(self, field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.where_eq(field, v),
            _ => self,
        }
    }

    /// Sets the free-text constraint. Empty needles are ignored.
    pub fn text<I, S>(mut self, needle: Option<&str>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(n) = needle.filter(|n| !n.is_empty()) {
            self.text = Some(TextMatch {
                needle: n.to_string(),
                fields: fields.into_iter().map(Into::into).collect(),
            });
        }
        self
    }

    pub fn equals(&self) -> &[(String, String)] {
        &self.equals
    }

    pub fn text_match(&self) -> Option<&TextMatch> {
        self.text.as_ref()
    }

    /// Evaluates the filter against a document body.
    pub fn matches(&self, doc: &Map<String, JsonValue>) -> bool {
        let equal = self
            .equals
            .iter()
            .all(|(field, value)| doc.get(field).and_then(|v| v.as_str()) == Some(value.as_str()));
        equal && self.text.as_ref().map_or(true, |t| t.matches(doc))
    }
}
