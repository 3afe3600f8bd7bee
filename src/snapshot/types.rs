//! Snapshot data model: node records, the snapshot map, and the
//! interactive-element descriptors handed to agents.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cdp::CdpError;

/// Configuration for one snapshot build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotConfig {
    /// Draw the highlight overlay after the build.
    pub show_highlight_elements: bool,
    /// Margin in pixels around the viewport within which elements are still
    /// highlightable; -1 disables the viewport check entirely.
    pub viewport_expansion: i32,
    /// Highlight index to emphasize in the overlay; -1 for none.
    pub focus_highlight_index: i32,
    /// Include build statistics in tool output.
    pub debug_mode: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            show_highlight_elements: false,
            viewport_expansion: 0,
            focus_highlight_index: -1,
            debug_mode: false,
        }
    }
}

impl SnapshotConfig {
    /// Whether the viewport check is disabled (`viewport_expansion == -1`).
    pub fn unlimited_viewport(&self) -> bool {
        self.viewport_expansion == -1
    }
}

/// An element entry in the snapshot map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    /// Tag name, lowercase.
    pub tag_name: String,
    /// Attributes, captured only for interaction candidates.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// XPath from the nearest document/shadow boundary.
    pub xpath: String,
    /// Child record ids in document order.
    #[serde(default)]
    pub children: Vec<String>,
    /// Set when the element hosts a shadow root whose children were walked.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shadow_root: bool,
    /// Rendered with non-zero size and not display:none/visibility:hidden.
    #[serde(default)]
    pub is_visible: bool,
    /// Confirmed top-most hit target at its location.
    #[serde(default)]
    pub is_top_element: bool,
    /// Classified interactive.
    #[serde(default)]
    pub is_interactive: bool,
    /// Overlaps the (expanded) viewport window.
    #[serde(default)]
    pub is_in_viewport: bool,
    /// Dense index assigned to addressable interaction targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_index: Option<u32>,
}

impl ElementRecord {
    /// Minimal record for a tag; classification fields default to false.
    pub fn new(tag_name: impl Into<String>, xpath: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
            xpath: xpath.into(),
            children: Vec::new(),
            shadow_root: false,
            is_visible: false,
            is_top_element: false,
            is_interactive: false,
            is_in_viewport: false,
            highlight_index: None,
        }
    }
}

/// A text entry in the snapshot map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    /// Trimmed text content.
    pub text: String,
    /// Whether the text is rendered and within the viewport window.
    pub is_visible: bool,
}

/// One node of the snapshot: either an element or a text run, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeRecord {
    Element(ElementRecord),
    Text(TextRecord),
}

impl NodeRecord {
    /// Element view of this record.
    pub fn as_element(&self) -> Option<&ElementRecord> {
        match self {
            NodeRecord::Element(el) => Some(el),
            NodeRecord::Text(_) => None,
        }
    }

    /// Text view of this record.
    pub fn as_text(&self) -> Option<&TextRecord> {
        match self {
            NodeRecord::Element(_) => None,
            NodeRecord::Text(text) => Some(text),
        }
    }

    /// Highlight index, if this record is an addressable element.
    pub fn highlight_index(&self) -> Option<u32> {
        self.as_element().and_then(|el| el.highlight_index)
    }

    /// Child ids, empty for text records.
    pub fn children(&self) -> &[String] {
        self.as_element().map(|el| el.children.as_slice()).unwrap_or(&[])
    }
}

/// A disconnected, serializable copy of a document produced by one build.
///
/// The map owns every record; no live browser references survive the build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Id of the body record.
    pub root_id: String,
    /// All records keyed by their build-scoped id.
    pub map: HashMap<String, NodeRecord>,
}

impl Snapshot {
    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Compact descriptor of one addressable element, ordered by `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElement {
    /// The element's highlight index.
    pub index: u32,
    /// Tag name.
    pub tag: String,
    /// Visible text, truncated to 50 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Link target for anchors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Input/button type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Form field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current value, included when short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Snapshot build errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The in-page capture evaluation failed (e.g. navigation mid-evaluate).
    #[error("Capture evaluation failed: {0}")]
    Evaluation(#[from] CdpError),

    /// The capture returned data the engine cannot decode.
    #[error("Malformed capture payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The captured document has no body to walk.
    #[error("Document has no body")]
    MissingBody,
}
