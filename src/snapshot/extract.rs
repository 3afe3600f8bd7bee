//! Interactive-element extraction: flattens a snapshot into the compact,
//! ordered descriptor list handed to the calling agent.

use tracing::trace;

use super::types::{ElementRecord, InteractiveElement, NodeRecord, Snapshot};

/// Longest text carried verbatim on a descriptor.
const TEXT_LIMIT: usize = 50;
/// Kept prefix when text is truncated (an ellipsis is appended).
const TEXT_KEPT: usize = 47;
/// Longest input value carried at all.
const VALUE_LIMIT: usize = 30;

/// Extract descriptors for every element carrying a highlight index.
///
/// Pure over the snapshot; safe to call repeatedly. The result is sorted
/// ascending by index — traversal order already matches for static
/// documents, but callers must not rely on that.
pub fn extract_interactive_elements(snapshot: &Snapshot) -> Vec<InteractiveElement> {
    let mut elements = Vec::new();
    traverse(snapshot, &snapshot.root_id, &mut elements);
    elements.sort_by_key(|el| el.index);
    trace!("Extracted {} interactive elements", elements.len());
    elements
}

fn traverse(snapshot: &Snapshot, id: &str, out: &mut Vec<InteractiveElement>) {
    let Some(record) = snapshot.map.get(id) else {
        return;
    };

    if let NodeRecord::Element(element) = record {
        if let Some(index) = element.highlight_index {
            out.push(describe(snapshot, element, index));
        }
    }

    for child in record.children() {
        traverse(snapshot, child, out);
    }
}

fn describe(snapshot: &Snapshot, element: &ElementRecord, index: u32) -> InteractiveElement {
    let mut descriptor = InteractiveElement {
        index,
        tag: element.tag_name.clone(),
        text: None,
        href: None,
        input_type: None,
        name: None,
        value: None,
        placeholder: None,
    };

    let attr = |name: &str| element.attributes.get(name).cloned();

    if element.tag_name == "a" {
        descriptor.href = attr("href");
    }

    if element.tag_name == "input" || element.tag_name == "button" {
        descriptor.input_type = attr("type");
        descriptor.name = attr("name");
        if let Some(value) = attr("value") {
            if value.chars().count() <= VALUE_LIMIT {
                descriptor.value = Some(value);
            }
        }
        descriptor.placeholder = attr("placeholder");
    }

    if element.tag_name == "select" {
        descriptor.name = attr("name");
    }

    // no own text on elements: gather visible direct text children
    let child_text = element
        .children
        .iter()
        .filter_map(|id| snapshot.map.get(id))
        .filter_map(NodeRecord::as_text)
        .filter(|t| t.is_visible && !t.text.is_empty())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let child_text = child_text.trim();
    if !child_text.is_empty() {
        descriptor.text = Some(truncate(child_text));
    }

    descriptor
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= TEXT_LIMIT {
        return text.to_string();
    }
    let mut kept: String = text.chars().take(TEXT_KEPT).collect();
    kept.push_str("...");
    kept
}
