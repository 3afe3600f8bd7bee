//! Visibility and viewport classification.

use super::capture::RawDocument;
use super::geometry::{GeometryCache, ViewportWindow};

/// Whether an element is rendered: non-zero size and not hidden by CSS.
pub fn is_element_visible(doc: &RawDocument, idx: usize, cache: &mut GeometryCache) -> bool {
    let Some(node) = doc.node(idx) else {
        return false;
    };
    if node.offset_width <= 0.0 || node.offset_height <= 0.0 {
        return false;
    }
    match cache.style(doc, idx) {
        Some(style) => style.visibility != "hidden" && style.display != "none",
        None => true,
    }
}

/// The parent element's native visibility capability: `checkVisibility`
/// (opacity + CSS visibility) where supported, a style check otherwise.
fn parent_visibility_capability(doc: &RawDocument, parent: usize, cache: &mut GeometryCache) -> bool {
    let Some(node) = doc.node(parent) else {
        return false;
    };
    if let Some(result) = node.check_visibility {
        return result;
    }
    match cache.style(doc, parent) {
        Some(style) => {
            style.display != "none" && style.visibility != "hidden" && style.opacity != "0"
        }
        None => false,
    }
}

/// Whether a text node is rendered and (unless the check is unlimited)
/// within the expanded viewport window.
pub fn is_text_visible(
    doc: &RawDocument,
    idx: usize,
    window: &ViewportWindow,
    cache: &mut GeometryCache,
) -> bool {
    let Some(node) = doc.node(idx) else {
        return false;
    };
    let Some(parent) = node.parent else {
        return false;
    };

    if window.unlimited() {
        return parent_visibility_capability(doc, parent, cache);
    }

    let mut any_rect_usable = false;
    for rect in cache.client_rects(doc, idx) {
        if rect.has_area() && window.overlaps(rect) {
            any_rect_usable = true;
            break;
        }
    }
    if !any_rect_usable {
        return false;
    }

    parent_visibility_capability(doc, parent, cache)
}

/// Whether any of the element's rects overlaps the expanded viewport.
///
/// Falls back to the bounding rect when the element reports no client
/// rects. Always true when the window is unlimited.
pub fn is_in_expanded_viewport(
    doc: &RawDocument,
    idx: usize,
    window: &ViewportWindow,
    cache: &mut GeometryCache,
) -> bool {
    if window.unlimited() {
        return true;
    }

    if cache.client_rects(doc, idx).is_empty() {
        return match cache.rect(doc, idx) {
            Some(rect) if rect.has_area() => window.overlaps(&rect),
            _ => false,
        };
    }

    cache
        .client_rects(doc, idx)
        .iter()
        .any(|r| r.has_area() && window.overlaps(r))
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
