//! Layout-element model and the extraction boundary.
//!
//! ## Where elements come from
//!
//! This crate does not parse source documents itself. A layout-extraction
//! tool (unstructured-style partitioners, OCR post-classifiers, …) runs
//! upstream and classifies each block of a document into a category plus its
//! raw text. [`ElementSource`] is the seam to that collaborator: anything
//! that can produce an ordered `Vec<LayoutElement>` for a document handle
//! can feed the pipeline.
//!
//! The built-in [`JsonElementSource`] reads the element JSON such tools
//! emit — an array of objects with a `"type"` tag and a `"text"` field.
//! Unknown fields (element ids, coordinates, metadata blobs) are ignored.

use crate::error::DocumentError;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Classification tag of one extracted layout element.
///
/// The set of tags an extraction tool emits is open-ended; the four variants
/// below are the ones that change rendering. Everything else lands in
/// [`ElementCategory::Other`] and is rendered with the plain-paragraph rule,
/// so a collaborator introducing a new category can never break the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementCategory {
    /// A document or section title. Rendered as a level-1 heading.
    Title,
    /// A table. Rendered inside a `text`-tagged fence to preserve alignment.
    Table,
    /// A list item. Rendered as a `- ` bullet line.
    ListItem,
    /// A normal paragraph. Rendered verbatim.
    NarrativeText,
    /// Any tag this crate does not recognise. Rendered like a paragraph.
    Other(String),
}

impl ElementCategory {
    /// The category's wire tag, as it appears in element JSON.
    pub fn as_str(&self) -> &str {
        match self {
            ElementCategory::Title => "Title",
            ElementCategory::Table => "Table",
            ElementCategory::ListItem => "ListItem",
            ElementCategory::NarrativeText => "NarrativeText",
            ElementCategory::Other(tag) => tag,
        }
    }
}

impl From<&str> for ElementCategory {
    fn from(tag: &str) -> Self {
        match tag {
            "Title" => ElementCategory::Title,
            "Table" => ElementCategory::Table,
            "ListItem" => ElementCategory::ListItem,
            "NarrativeText" => ElementCategory::NarrativeText,
            other => ElementCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ElementCategory::from(tag.as_str()))
    }
}

/// One classified unit of extracted document content.
///
/// Immutable input to the pipeline: a category tag plus the raw text of the
/// block. Text may be empty or whitespace-only; such elements are skipped at
/// render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Classification tag. Element JSON uses `"type"`; `"category"` is
    /// accepted as an alias.
    #[serde(alias = "type")]
    pub category: ElementCategory,

    /// Raw text of the block. May span multiple lines (tables often do).
    #[serde(default)]
    pub text: String,
}

impl LayoutElement {
    /// Construct an element from a category and its raw text.
    pub fn new(category: ElementCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

/// The extraction collaborator: produces the ordered element sequence for a
/// document handle.
///
/// Implementations must be `Send + Sync` so a source can be shared across a
/// batch run via `Arc`. Failures are reported as [`DocumentError`] — per
/// document, never fatal to a batch.
pub trait ElementSource: Send + Sync {
    /// File extension (without dot) this source expects when a directory is
    /// scanned for inputs.
    fn input_extension(&self) -> &str {
        "json"
    }

    /// Produce the ordered element sequence for the document at `path`.
    fn partition(&self, path: &Path) -> Result<Vec<LayoutElement>, DocumentError>;
}

/// Reads element JSON files: a top-level array of `{"type", "text"}` objects.
///
/// This is the default source when [`crate::config::NormalizeConfig::source`]
/// is not set.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonElementSource;

impl ElementSource for JsonElementSource {
    fn partition(&self, path: &Path) -> Result<Vec<LayoutElement>, DocumentError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DocumentError::ExtractionFailed {
            doc: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let elements: Vec<LayoutElement> =
            serde_json::from_str(&raw).map_err(|e| DocumentError::InvalidElements {
                doc: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        debug!(
            "Partitioned {} elements from {}",
            elements.len(),
            path.display()
        );
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_known_tags() {
        for tag in ["Title", "Table", "ListItem", "NarrativeText"] {
            let cat = ElementCategory::from(tag);
            assert_eq!(cat.as_str(), tag);
            assert!(!matches!(cat, ElementCategory::Other(_)));
        }
    }

    #[test]
    fn unknown_tag_becomes_other() {
        let cat = ElementCategory::from("PageBreak");
        assert_eq!(cat, ElementCategory::Other("PageBreak".to_string()));
        assert_eq!(cat.as_str(), "PageBreak");
    }

    #[test]
    fn element_deserializes_from_type_tag() {
        let json = r#"{"type": "Title", "text": "Experience"}"#;
        let el: LayoutElement = serde_json::from_str(json).unwrap();
        assert_eq!(el.category, ElementCategory::Title);
        assert_eq!(el.text, "Experience");
    }

    #[test]
    fn element_accepts_category_alias_and_extra_fields() {
        let json = r#"{
            "category": "ListItem",
            "text": "Engineer",
            "element_id": "abc123",
            "metadata": {"page_number": 2}
        }"#;
        let el: LayoutElement = serde_json::from_str(json).unwrap();
        assert_eq!(el.category, ElementCategory::ListItem);
        assert_eq!(el.text, "Engineer");
    }

    #[test]
    fn missing_text_defaults_to_empty() {
        let json = r#"{"type": "PageBreak"}"#;
        let el: LayoutElement = serde_json::from_str(json).unwrap();
        assert!(el.text.is_empty());
    }

    #[test]
    fn category_serializes_as_plain_string() {
        let el = LayoutElement::new(ElementCategory::Other("Footer".into()), "p. 9");
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains(r#""category":"Footer""#), "got: {json}");
    }
}
