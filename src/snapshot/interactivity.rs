//! Interactivity classification.
//!
//! The classifier is an ordered list of named predicate rules, evaluated
//! until one yields a verdict. Keeping each heuristic a named rule keeps
//! the set auditable and testable rule by rule. The rules deliberately
//! mirror how real pages signal interactivity (cursor, native tags, ARIA,
//! inline handlers); they over- and under-classify on exotic UIs, which is
//! accepted noise.

use super::capture::{RawDocument, RawNode};
use super::geometry::{ComputedStyle, GeometryCache};

/// Cursor values that signal an interactive region.
pub(crate) const INTERACTIVE_CURSORS: &[&str] = &[
    "pointer",
    "move",
    "text",
    "grab",
    "grabbing",
    "cell",
    "copy",
    "alias",
    "all-scroll",
    "col-resize",
    "context-menu",
    "crosshair",
    "e-resize",
    "ew-resize",
    "help",
    "n-resize",
    "ne-resize",
    "nesw-resize",
    "ns-resize",
    "nw-resize",
    "nwse-resize",
    "row-resize",
    "s-resize",
    "se-resize",
    "sw-resize",
    "vertical-text",
    "w-resize",
    "zoom-in",
    "zoom-out",
];

/// Cursor values that veto interactivity on native controls.
pub(crate) const NON_INTERACTIVE_CURSORS: &[&str] =
    &["not-allowed", "no-drop", "wait", "progress", "initial", "inherit"];

/// Natively interactive tags.
pub(crate) const NATIVE_INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "details", "summary", "label", "option",
    "optgroup", "fieldset", "legend",
];

/// ARIA roles treated as interactive by the classifier.
pub(crate) const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "menu",
    "menubar",
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

/// Mouse handler attributes/properties the classifier recognizes.
pub(crate) const MOUSE_EVENT_ATTRS: &[&str] = &["onclick", "onmousedown", "onmouseup", "ondblclick"];

/// Inputs to one rule evaluation.
pub struct RuleCtx<'a> {
    pub node: &'a RawNode,
    pub style: Option<ComputedStyle>,
}

impl RuleCtx<'_> {
    fn cursor(&self) -> Option<&str> {
        self.style.as_ref().map(|s| s.cursor.as_str())
    }
}

/// A named classification rule. `eval` returns a verdict or passes.
pub struct Rule {
    pub name: &'static str,
    pub eval: fn(&RuleCtx) -> Option<bool>,
}

/// The classifier cascade, in evaluation order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "interactive-cursor",
        eval: cursor_rule,
    },
    Rule {
        name: "native-tag",
        eval: native_tag_rule,
    },
    Rule {
        name: "content-editable",
        eval: content_editable_rule,
    },
    Rule {
        name: "class-and-attributes",
        eval: class_attr_rule,
    },
    Rule {
        name: "aria-role",
        eval: aria_role_rule,
    },
    Rule {
        name: "event-handler-attributes",
        eval: event_attr_rule,
    },
];

fn cursor_rule(ctx: &RuleCtx) -> Option<bool> {
    if ctx.node.tag == "html" {
        return None;
    }
    match ctx.cursor() {
        Some(cursor) if INTERACTIVE_CURSORS.contains(&cursor) => Some(true),
        _ => None,
    }
}

fn native_tag_rule(ctx: &RuleCtx) -> Option<bool> {
    if !NATIVE_INTERACTIVE_TAGS.contains(&ctx.node.tag.as_str()) {
        return None;
    }
    if let Some(cursor) = ctx.cursor() {
        if NON_INTERACTIVE_CURSORS.contains(&cursor) {
            return Some(false);
        }
    }
    // explicit disabling wins over the native tag, attribute or property
    if ctx.node.has_attr("disabled") || ctx.node.has_attr("readonly") {
        return Some(false);
    }
    if ctx.node.disabled || ctx.node.read_only || ctx.node.inert {
        return Some(false);
    }
    Some(true)
}

fn content_editable_rule(ctx: &RuleCtx) -> Option<bool> {
    if ctx.node.attr("contenteditable") == Some("true") || ctx.node.is_content_editable {
        Some(true)
    } else {
        None
    }
}

fn class_attr_rule(ctx: &RuleCtx) -> Option<bool> {
    let node = ctx.node;
    let class_hit = node
        .class_tokens()
        .any(|t| t == "button" || t == "dropdown-toggle");
    if class_hit
        || node.has_attr("data-index")
        || node.attr("data-toggle") == Some("dropdown")
        || node.attr("aria-haspopup") == Some("true")
    {
        Some(true)
    } else {
        None
    }
}

fn aria_role_rule(ctx: &RuleCtx) -> Option<bool> {
    let role_hit = [ctx.node.attr("role"), ctx.node.attr("aria-role")]
        .into_iter()
        .flatten()
        .any(|role| INTERACTIVE_ROLES.contains(&role));
    if role_hit { Some(true) } else { None }
}

fn event_attr_rule(ctx: &RuleCtx) -> Option<bool> {
    let hit = MOUSE_EVENT_ATTRS
        .iter()
        .any(|attr| ctx.node.has_attr(attr) || ctx.node.has_bound_handler(attr));
    if hit { Some(true) } else { None }
}

/// Run the cascade for a node. Non-interactive unless some rule says so;
/// the heuristic fallback (resolver) may still promote the element later.
pub fn is_interactive_element(doc: &RawDocument, idx: usize, cache: &mut GeometryCache) -> bool {
    let Some(node) = doc.node(idx) else {
        return false;
    };
    let ctx = RuleCtx {
        node,
        style: cache.style(doc, idx).cloned(),
    };
    for rule in RULES {
        if let Some(verdict) = (rule.eval)(&ctx) {
            return verdict;
        }
    }
    false
}

#[cfg(test)]
#[path = "interactivity_tests.rs"]
mod tests;
