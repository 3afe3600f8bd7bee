//! Raw document capture: the page-side half of the snapshot build.
//!
//! One evaluate round-trip runs the embedded capture script, which flattens
//! the live DOM (light children, open shadow roots, same-origin iframe
//! documents) into an index-linked arena of raw nodes. The script records
//! only observations — geometry, sampled styles, attribute maps, hit-test
//! samples — and classifies nothing; every heuristic runs in Rust over the
//! returned arena.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cdp::PageSession;

use super::HIGHLIGHT_CONTAINER_ID;
use super::types::{SnapshotConfig, SnapshotError};

/// Margin in pixels used to inset the corner hit-test points.
pub(crate) const HIT_TEST_MARGIN: f64 = 5.0;

/// Load the capture script (the body of a `function(args)`).
fn capture_script() -> &'static str {
    include_str!("capture.js")
}

/// Raw node kind as captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawNodeKind {
    #[default]
    Element,
    Text,
}

/// Axis-aligned rectangle as reported by the page, viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Sampled computed-style subset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStyle {
    pub display: String,
    pub visibility: String,
    pub cursor: String,
    pub position: String,
    pub opacity: String,
}

/// One point-based hit-test sample.
///
/// `hit` is the arena index of the nearest captured ancestor of the element
/// returned by the point lookup; `threw` records that the lookup raised.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHitCheck {
    pub hit: Option<usize>,
    pub threw: bool,
}

/// One captured DOM node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub kind: RawNodeKind,
    /// Tag name, lowercase; empty for text nodes.
    pub tag: String,
    /// Text content for text nodes.
    pub text: String,
    pub parent: Option<usize>,
    /// Light-DOM children.
    pub children: Vec<usize>,
    /// Children of an open shadow root hosted by this element.
    pub shadow_children: Vec<usize>,
    /// Child nodes of an iframe's content document.
    pub frame_children: Vec<usize>,
    /// Reading the iframe's content document was denied (cross-origin).
    pub frame_denied: bool,
    pub has_shadow_root: bool,
    pub attributes: HashMap<String, String>,
    /// Bounding client rect; absent when the node has no layout box.
    pub rect: Option<RawRect>,
    /// Client rects (range rects for text nodes).
    pub client_rects: Vec<RawRect>,
    pub offset_width: f64,
    pub offset_height: f64,
    pub style: Option<RawStyle>,
    /// Live `isContentEditable` state.
    pub is_content_editable: bool,
    /// Live `disabled` / `readOnly` / `inert` properties.
    pub disabled: bool,
    pub read_only: bool,
    pub inert: bool,
    /// Names of common handler properties bound as functions (e.g. "onclick").
    pub bound_handlers: Vec<String>,
    /// `checkVisibility({opacity, css})` result; absent where unsupported.
    pub check_visibility: Option<bool>,
    /// The node's root is a shadow root.
    pub in_shadow_root: bool,
    /// The node's owner document is the top-level document.
    pub in_main_document: bool,
    /// Hit-test samples at center plus two inset corners of the middle
    /// client rect; empty where sampling was skipped.
    pub hit_checks: Vec<RawHitCheck>,
}

impl RawNode {
    /// Attribute lookup.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the attribute is present at all.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Whether a handler property of this name is bound as a function.
    pub fn has_bound_handler(&self, name: &str) -> bool {
        self.bound_handlers.iter().any(|h| h == name)
    }

    /// Class attribute split into tokens.
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }
}

/// Window dimensions at capture time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawViewport {
    pub width: f64,
    pub height: f64,
}

/// The flattened document returned by the capture script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDocument {
    pub nodes: Vec<RawNode>,
    /// Arena index of `document.body`.
    pub body: Option<usize>,
    pub viewport: RawViewport,
}

impl RawDocument {
    /// Node at an arena index.
    pub fn node(&self, idx: usize) -> Option<&RawNode> {
        self.nodes.get(idx)
    }

    /// Walk ancestors starting from a node's parent.
    pub fn ancestors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let mut current = self.nodes.get(idx).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let idx = current?;
            current = self.nodes.get(idx).and_then(|n| n.parent);
            Some(idx)
        })
    }
}

/// Run the capture script in the page and decode the arena.
///
/// This is the single atomic round-trip of the build: the script walks the
/// DOM as it exists at invocation time, without yielding.
pub async fn capture_document(
    session: &PageSession,
    config: &SnapshotConfig,
) -> Result<RawDocument, SnapshotError> {
    let args = json!({
        "containerId": HIGHLIGHT_CONTAINER_ID,
        "hitMargin": HIT_TEST_MARGIN,
        "viewportExpansion": config.viewport_expansion,
    });

    let value = session.evaluate_function(capture_script(), &args).await?;
    let raw: RawDocument = serde_json::from_value(value)?;
    Ok(raw)
}
