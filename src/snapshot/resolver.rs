//! Top-element resolution and distinct-interaction decisions.
//!
//! An interactive element only deserves an index if it is actually the
//! hit-testable top layer at its location, and a nested interactive element
//! only deserves its *own* index when it is a genuinely separate
//! interaction rather than decoration inside an already-highlighted region.

use once_cell::sync::Lazy;
use regex::Regex;

use super::capture::RawDocument;
use super::geometry::{GeometryCache, ViewportWindow};
use super::interactivity;
use super::types::{ElementRecord, SnapshotConfig};
use super::visibility;

/// Tags that always warrant their own index inside a highlighted ancestor.
const DISTINCT_INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "summary", "details", "label", "option",
];

/// Roles that warrant a distinct index.
const DISTINCT_INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "link",
    "menuitem",
    "menuitemradio",
    "menuitemcheckbox",
    "radio",
    "checkbox",
    "tab",
    "switch",
    "slider",
    "spinbutton",
    "combobox",
    "searchbox",
    "textbox",
    "listbox",
    "option",
    "scrollbar",
];

/// Test hooks that mark an element as an intentional interaction target.
const TEST_ID_ATTRS: &[&str] = &["data-testid", "data-cy", "data-test"];

/// Common inline event attributes beyond the mouse set.
const COMMON_EVENT_ATTRS: &[&str] = &[
    "onmousedown",
    "onmouseup",
    "onkeydown",
    "onkeyup",
    "onsubmit",
    "onchange",
    "oninput",
    "onfocus",
    "onblur",
];

static INTERACTIVE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(btn|clickable|menu|item|entry|link)\b").expect("static pattern")
});

/// Whether the element is the top-most hit target at its location.
///
/// With the viewport check disabled every element counts as top. Elements
/// in foreign documents (iframe content) are always top; shadow-hosted
/// elements are resolved against their shadow root's own point lookup. A
/// lookup that threw is treated as top so overlays cannot silently hide
/// elements.
pub fn is_top_element(
    doc: &RawDocument,
    idx: usize,
    config: &SnapshotConfig,
    window: &ViewportWindow,
    cache: &mut GeometryCache,
) -> bool {
    if config.unlimited_viewport() {
        return true;
    }

    let Some(node) = doc.node(idx) else {
        return false;
    };

    let usable = cache
        .client_rects(doc, idx)
        .iter()
        .any(|r| r.has_area() && window.overlaps(r));
    if !usable {
        return false;
    }

    if !node.in_main_document {
        return true;
    }

    if node.in_shadow_root {
        // shadow-scoped lookup: single center sample
        return match node.hit_checks.first() {
            Some(check) if check.threw => true,
            Some(check) => match check.hit {
                Some(hit) => chain_contains(doc, hit, idx),
                None => false,
            },
            None => true,
        };
    }

    if node.hit_checks.is_empty() {
        return true;
    }

    node.hit_checks.iter().any(|check| {
        if check.threw {
            return true;
        }
        match check.hit {
            Some(hit) => chain_contains(doc, hit, idx),
            None => false,
        }
    })
}

/// Whether `target` is `start` or one of its ancestors.
fn chain_contains(doc: &RawDocument, start: usize, target: usize) -> bool {
    if start == target {
        return true;
    }
    doc.ancestors(start).any(|a| a == target)
}

/// Supplementary signal for elements the strict classifier missed: looks
/// interactive, has visible children, and sits inside a known interactive
/// container rather than at the top of the page.
pub fn is_heuristically_interactive(
    doc: &RawDocument,
    idx: usize,
    cache: &mut GeometryCache,
) -> bool {
    let Some(node) = doc.node(idx) else {
        return false;
    };
    if !visibility::is_element_visible(doc, idx, cache) {
        return false;
    }

    let has_interactive_attrs = node.has_attr("role")
        || node.has_attr("tabindex")
        || node.has_attr("onclick")
        || node.has_bound_handler("onclick");
    let has_interactive_class = node
        .attr("class")
        .is_some_and(|c| INTERACTIVE_CLASS.is_match(c));

    if !(interactivity::is_interactive_element(doc, idx, cache)
        || has_interactive_attrs
        || has_interactive_class)
    {
        return false;
    }

    let has_visible_child = node
        .children
        .iter()
        .any(|&child| visibility::is_element_visible(doc, child, cache));
    if !has_visible_child {
        return false;
    }

    if node.parent == doc.body {
        return false;
    }

    in_known_interactive_container(doc, idx)
}

/// Equivalent of `closest('button,a,[role="button"],.menu,.dropdown,.list,.toolbar')`.
fn in_known_interactive_container(doc: &RawDocument, idx: usize) -> bool {
    std::iter::once(idx)
        .chain(doc.ancestors(idx))
        .any(|a| match doc.node(a) {
            Some(node) => {
                node.tag == "button"
                    || node.tag == "a"
                    || node.attr("role") == Some("button")
                    || node
                        .class_tokens()
                        .any(|t| matches!(t, "menu" | "dropdown" | "list" | "toolbar"))
            }
            None => false,
        })
}

/// Whether a node beneath an already-highlighted ancestor still deserves
/// its own index.
pub fn is_element_distinct_interaction(
    doc: &RawDocument,
    idx: usize,
    cache: &mut GeometryCache,
) -> bool {
    let Some(node) = doc.node(idx) else {
        return false;
    };
    let tag = node.tag.as_str();

    if tag == "iframe" {
        return true;
    }
    if DISTINCT_INTERACTIVE_TAGS.contains(&tag) {
        return true;
    }
    if node
        .attr("role")
        .is_some_and(|role| DISTINCT_INTERACTIVE_ROLES.contains(&role))
    {
        return true;
    }
    if node.is_content_editable || node.attr("contenteditable") == Some("true") {
        return true;
    }
    if TEST_ID_ATTRS.iter().any(|attr| node.has_attr(attr)) {
        return true;
    }
    if node.has_attr("onclick") || node.has_bound_handler("onclick") {
        return true;
    }
    if COMMON_EVENT_ATTRS.iter().any(|attr| node.has_attr(attr)) {
        return true;
    }

    is_heuristically_interactive(doc, idx, cache)
}

/// Decide whether an interactive element becomes a highlight root, and
/// assign the next dense index if it does.
///
/// Returns true when the node took an index; callers OR this into the
/// ancestor-highlighted flag for the subtree.
pub fn handle_highlighting(
    record: &mut ElementRecord,
    doc: &RawDocument,
    idx: usize,
    is_parent_highlighted: bool,
    config: &SnapshotConfig,
    window: &ViewportWindow,
    cache: &mut GeometryCache,
    next_highlight: &mut u32,
) -> bool {
    if !record.is_interactive {
        return false;
    }

    let should_highlight = if !is_parent_highlighted {
        true
    } else {
        is_element_distinct_interaction(doc, idx, cache)
    };
    if !should_highlight {
        return false;
    }

    record.is_in_viewport = visibility::is_in_expanded_viewport(doc, idx, window, cache);
    if record.is_in_viewport || config.unlimited_viewport() {
        record.highlight_index = Some(*next_highlight);
        *next_highlight += 1;
        return true;
    }

    false
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
