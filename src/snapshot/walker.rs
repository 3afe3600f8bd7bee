//! The tree walker: drives classification over the captured arena and
//! produces the snapshot map.
//!
//! The walk is one pass, parent before children, with no backtracking: a
//! node's visibility/interactivity/highlight decisions are final once made.
//! All build state lives in a [`WalkState`] accumulator scoped to the call;
//! nothing survives across builds.

use std::collections::HashMap;

use tracing::warn;

use super::HIGHLIGHT_CONTAINER_ID;
use super::capture::{RawDocument, RawNode, RawNodeKind};
use super::geometry::{GeometryCache, Rect, ViewportWindow};
use super::interactivity;
use super::resolver;
use super::types::{ElementRecord, NodeRecord, Snapshot, SnapshotConfig, SnapshotError, TextRecord};
use super::visibility;

/// Tags never recorded unless on the always-accept list.
const DENY_TAGS: &[&str] = &["svg", "script", "style", "link", "meta", "noscript", "template"];

/// Structural tags always recorded.
const ALWAYS_ACCEPT_TAGS: &[&str] = &[
    "body", "div", "main", "article", "section", "nav", "header", "footer",
];

/// Tags whose attributes are always worth carrying.
const CANDIDATE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "details", "summary", "label",
];

/// ARIA container roles treated as top-equivalent for highlighting.
const MENU_CONTAINER_ROLES: &[&str] = &["menu", "menubar", "listbox"];

/// Screen rectangle of one assigned highlight, for the overlay.
#[derive(Debug, Clone, Copy)]
pub struct HighlightBox {
    pub index: u32,
    pub rect: Rect,
}

/// Output of one walk: the snapshot plus overlay geometry.
#[derive(Debug)]
pub struct WalkResult {
    pub snapshot: Snapshot,
    pub highlights: Vec<HighlightBox>,
}

/// Build-scoped accumulator threaded through the walk.
struct WalkState {
    map: HashMap<String, NodeRecord>,
    next_id: u64,
    next_highlight: u32,
    xpaths: HashMap<usize, String>,
    highlights: Vec<HighlightBox>,
    cache: GeometryCache,
}

impl WalkState {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            next_id: 0,
            next_highlight: 0,
            xpaths: HashMap::new(),
            highlights: Vec::new(),
            cache: GeometryCache::new(),
        }
    }

    fn insert(&mut self, record: NodeRecord) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.map.insert(id.clone(), record);
        id
    }
}

/// Walk a captured document into a [`Snapshot`].
///
/// Pure over the capture: no browser round-trips. The geometry cache is
/// cleared before returning.
pub fn walk_document(doc: &RawDocument, config: &SnapshotConfig) -> Result<WalkResult, SnapshotError> {
    let body = doc.body.ok_or(SnapshotError::MissingBody)?;
    let window = ViewportWindow::new(
        doc.viewport.width,
        doc.viewport.height,
        config.viewport_expansion,
    );

    let mut state = WalkState::new();
    let root_id = visit(doc, body, false, config, &window, &mut state)
        .ok_or(SnapshotError::MissingBody)?;

    state.cache.clear();

    Ok(WalkResult {
        snapshot: Snapshot {
            root_id,
            map: state.map,
        },
        highlights: state.highlights,
    })
}

fn visit(
    doc: &RawDocument,
    idx: usize,
    is_parent_highlighted: bool,
    config: &SnapshotConfig,
    window: &ViewportWindow,
    state: &mut WalkState,
) -> Option<String> {
    let node = doc.node(idx)?;

    if node.attr("id") == Some(HIGHLIGHT_CONTAINER_ID) {
        return None;
    }

    // the main document body gets a minimal record and plain recursion
    if doc.body == Some(idx) {
        let mut record = ElementRecord::new("body", "/body");
        for &child in &node.children {
            if let Some(child_id) = visit(doc, child, false, config, window, state) {
                record.children.push(child_id);
            }
        }
        return Some(state.insert(NodeRecord::Element(record)));
    }

    match node.kind {
        RawNodeKind::Text => visit_text(doc, idx, node, window, state),
        RawNodeKind::Element => {
            visit_element(doc, idx, node, is_parent_highlighted, config, window, state)
        }
    }
}

fn visit_text(
    doc: &RawDocument,
    idx: usize,
    node: &RawNode,
    window: &ViewportWindow,
    state: &mut WalkState,
) -> Option<String> {
    let text = node.text.trim();
    if text.is_empty() {
        return None;
    }

    let parent = node.parent?;
    if doc.node(parent)?.tag == "script" {
        return None;
    }

    let record = TextRecord {
        text: text.to_string(),
        is_visible: visibility::is_text_visible(doc, idx, window, &mut state.cache),
    };
    Some(state.insert(NodeRecord::Text(record)))
}

fn visit_element(
    doc: &RawDocument,
    idx: usize,
    node: &RawNode,
    is_parent_highlighted: bool,
    config: &SnapshotConfig,
    window: &ViewportWindow,
    state: &mut WalkState,
) -> Option<String> {
    if !is_element_accepted(node) {
        return None;
    }

    // cheap reject before any recursion: off-screen zero-size subtrees are
    // noise, except fixed/sticky elements (small but critical toolbars)
    if !config.unlimited_viewport() && !node.has_shadow_root {
        let rect = state.cache.rect(doc, idx);
        let fixed_or_sticky = state
            .cache
            .style(doc, idx)
            .is_some_and(|s| s.is_fixed_or_sticky());
        let has_size = node.offset_width > 0.0 || node.offset_height > 0.0;

        match rect {
            None => return None,
            Some(rect) => {
                if !fixed_or_sticky && !has_size && !window.overlaps(&rect) {
                    return None;
                }
            }
        }
    }

    let mut record = ElementRecord::new(node.tag.clone(), xpath_for(doc, idx, state));

    if is_interactive_candidate(node) || node.tag == "iframe" || node.tag == "body" {
        record.attributes = node
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
    }

    let mut node_was_highlighted = false;

    record.is_visible = visibility::is_element_visible(doc, idx, &mut state.cache);
    if record.is_visible {
        record.is_top_element = resolver::is_top_element(doc, idx, config, window, &mut state.cache);

        let is_menu_container = node
            .attr("role")
            .is_some_and(|role| MENU_CONTAINER_ROLES.contains(&role));

        if record.is_top_element || is_menu_container {
            record.is_interactive =
                interactivity::is_interactive_element(doc, idx, &mut state.cache);
            node_was_highlighted = resolver::handle_highlighting(
                &mut record,
                doc,
                idx,
                is_parent_highlighted,
                config,
                window,
                &mut state.cache,
                &mut state.next_highlight,
            );
            if node_was_highlighted {
                if let (Some(index), Some(rect)) =
                    (record.highlight_index, state.cache.rect(doc, idx))
                {
                    state.highlights.push(HighlightBox { index, rect });
                }
            }
        }
    }

    if node.tag == "iframe" {
        if node.frame_denied {
            warn!("Unable to access iframe content at {}", record.xpath);
        }
        for &child in &node.frame_children {
            if let Some(child_id) = visit(doc, child, false, config, window, state) {
                record.children.push(child_id);
            }
        }
    } else if is_editable_root(node) {
        // editable regions pass their own highlight result down, so their
        // internal structure does not double-trigger on the inherited flag
        for &child in &node.children {
            if let Some(child_id) = visit(doc, child, node_was_highlighted, config, window, state) {
                record.children.push(child_id);
            }
        }
    } else {
        let child_flag = node_was_highlighted || is_parent_highlighted;
        if node.has_shadow_root {
            record.shadow_root = true;
            for &child in &node.shadow_children {
                if let Some(child_id) = visit(doc, child, child_flag, config, window, state) {
                    record.children.push(child_id);
                }
            }
        }
        for &child in &node.children {
            if let Some(child_id) = visit(doc, child, child_flag, config, window, state) {
                record.children.push(child_id);
            }
        }
    }

    // empty anchors with no href are decoration unless they have real size
    if record.tag_name == "a"
        && record.children.is_empty()
        && !record.attributes.contains_key("href")
    {
        let rect_has_size = state
            .cache
            .rect(doc, idx)
            .is_some_and(|r| r.has_area());
        let has_size = rect_has_size || node.offset_width > 0.0 || node.offset_height > 0.0;
        if !has_size {
            return None;
        }
    }

    Some(state.insert(NodeRecord::Element(record)))
}

fn is_element_accepted(node: &RawNode) -> bool {
    if node.tag.is_empty() {
        return false;
    }
    if ALWAYS_ACCEPT_TAGS.contains(&node.tag.as_str()) {
        return true;
    }
    !DENY_TAGS.contains(&node.tag.as_str())
}

/// Whether the element's attributes are worth carrying in the record.
fn is_interactive_candidate(node: &RawNode) -> bool {
    if CANDIDATE_TAGS.contains(&node.tag.as_str()) {
        return true;
    }
    node.has_attr("onclick")
        || node.has_attr("role")
        || node.has_attr("tabindex")
        || node.has_attr("data-action")
        || node.attributes.keys().any(|k| k.starts_with("aria-"))
        || node.attr("contenteditable") == Some("true")
}

/// Content-editable roots, including common rich-text-editor markers.
fn is_editable_root(node: &RawNode) -> bool {
    node.is_content_editable
        || node.attr("contenteditable") == Some("true")
        || node.attr("id") == Some("tinymce")
        || node.class_tokens().any(|t| t == "mce-content-body")
        || (node.tag == "body"
            && node
                .attr("data-id")
                .is_some_and(|v| v.starts_with("mce_")))
}

/// XPath from the nearest document/shadow boundary, memoized per node.
fn xpath_for(doc: &RawDocument, idx: usize, state: &mut WalkState) -> String {
    if let Some(cached) = state.xpaths.get(&idx) {
        return cached.clone();
    }

    let mut segments: Vec<String> = Vec::new();
    let mut current = idx;

    loop {
        let Some(node) = doc.node(current) else {
            break;
        };
        if node.kind != RawNodeKind::Element {
            break;
        }

        let parent = node.parent;
        // stop at shadow-root and iframe boundaries: those children are not
        // light-DOM children of their parent
        let is_light_child = parent
            .and_then(|p| doc.node(p))
            .is_some_and(|p| p.children.contains(&current));

        let position = parent
            .and_then(|p| doc.node(p))
            .map(|p| sibling_position(doc, p, current, &node.tag))
            .unwrap_or(0);

        let segment = if position > 0 {
            format!("{}[{}]", node.tag, position)
        } else {
            node.tag.clone()
        };
        segments.push(segment);

        match parent {
            Some(p) if is_light_child => current = p,
            _ => break,
        }
    }

    segments.reverse();
    let xpath = segments.join("/");
    state.xpaths.insert(idx, xpath.clone());
    xpath
}

/// 1-based index among same-tag element siblings; 0 when the tag is unique.
fn sibling_position(doc: &RawDocument, parent: &RawNode, child: usize, tag: &str) -> usize {
    let same_tag: Vec<usize> = parent
        .children
        .iter()
        .copied()
        .filter(|&c| {
            doc.node(c)
                .is_some_and(|n| n.kind == RawNodeKind::Element && n.tag == tag)
        })
        .collect();

    if same_tag.len() <= 1 {
        return 0;
    }
    same_tag.iter().position(|&c| c == child).map_or(0, |p| p + 1)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
