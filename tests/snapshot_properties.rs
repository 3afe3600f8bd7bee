//! End-to-end properties of the snapshot engine over captured documents.
//!
//! Raw documents are given as JSON exactly as the capture script would
//! return them, then walked and extracted through the public API.

use serde_json::{Value, json};

use pagescope::snapshot::capture::RawDocument;
use pagescope::snapshot::walker::walk_document;
use pagescope::snapshot::{
    NodeRecord, Snapshot, SnapshotConfig, extract_interactive_elements,
};

fn element(tag: &str, parent: Option<usize>, y: f64) -> Value {
    json!({
        "kind": "element",
        "tag": tag,
        "parent": parent,
        "children": [],
        "rect": { "x": 0.0, "y": y, "width": 200.0, "height": 24.0 },
        "clientRects": [{ "x": 0.0, "y": y, "width": 200.0, "height": 24.0 }],
        "offsetWidth": 200.0,
        "offsetHeight": 24.0,
        "style": {
            "display": "block",
            "visibility": "visible",
            "cursor": "auto",
            "position": "static",
            "opacity": "1"
        },
        "checkVisibility": true,
        "inMainDocument": true,
        "attributes": {},
        "hitChecks": []
    })
}

fn text(parent: usize, content: &str, y: f64) -> Value {
    json!({
        "kind": "text",
        "text": content,
        "parent": parent,
        "clientRects": [{ "x": 0.0, "y": y, "width": 120.0, "height": 16.0 }],
        "checkVisibility": true,
        "inMainDocument": true
    })
}

/// A small page: body > (button "Submit", input[disabled], a[href] "Docs",
/// offscreen button "Later").
fn sample_document() -> RawDocument {
    let mut body = element("body", None, 0.0);
    body["tag"] = json!("body");
    body["rect"] = json!({ "x": 0.0, "y": 0.0, "width": 1280.0, "height": 720.0 });
    body["offsetWidth"] = json!(1280.0);
    body["offsetHeight"] = json!(720.0);
    body["children"] = json!([1, 3, 5, 7]);

    let mut button = element("button", Some(0), 10.0);
    button["children"] = json!([2]);
    button["hitChecks"] = json!([{ "hit": 1 }, { "hit": 1 }, { "hit": 1 }]);

    let mut input = element("input", Some(0), 40.0);
    input["attributes"] = json!({ "disabled": "" });
    input["disabled"] = json!(true);

    let mut anchor = element("a", Some(0), 70.0);
    anchor["children"] = json!([6]);
    anchor["attributes"] = json!({ "href": "/docs" });

    let mut later = element("button", Some(0), 5000.0);
    later["children"] = json!([8]);

    let doc = json!({
        "nodes": [
            body,
            button,
            text(1, "Submit", 10.0),
            input,
            text(3, " ", 40.0),
            anchor,
            text(5, "Docs", 70.0),
            later,
            text(7, "Later", 5000.0)
        ],
        "body": 0,
        "viewport": { "width": 1280.0, "height": 720.0 }
    });

    serde_json::from_value(doc).expect("capture payload decodes")
}

fn config(expansion: i32) -> SnapshotConfig {
    serde_json::from_value(json!({ "viewportExpansion": expansion })).expect("config decodes")
}

fn highlighted(snapshot: &Snapshot) -> Vec<u32> {
    let mut indices: Vec<u32> = snapshot
        .map
        .values()
        .filter_map(NodeRecord::highlight_index)
        .collect();
    indices.sort_unstable();
    indices
}

#[test]
fn highlight_indices_are_dense_and_zero_based() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");
    let indices = highlighted(&result.snapshot);
    let expected: Vec<u32> = (0..indices.len() as u32).collect();
    assert_eq!(indices, expected);
    assert!(!indices.is_empty());
}

#[test]
fn no_dangling_child_references() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");
    for record in result.snapshot.map.values() {
        for child in record.children() {
            assert!(result.snapshot.map.contains_key(child));
        }
    }
}

#[test]
fn no_highlight_without_visibility() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");
    for element in result.snapshot.map.values().filter_map(NodeRecord::as_element) {
        if element.highlight_index.is_some() {
            assert!(element.is_visible, "{} highlighted but invisible", element.xpath);
        }
    }
}

#[test]
fn extraction_is_sorted_and_pure() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");

    let first = extract_interactive_elements(&result.snapshot);
    let second = extract_interactive_elements(&result.snapshot);
    assert_eq!(first, second);

    let indices: Vec<u32> = first.iter().map(|e| e.index).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);
}

#[test]
fn descriptors_carry_text_and_href() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");
    let elements = extract_interactive_elements(&result.snapshot);

    let button = elements.iter().find(|e| e.tag == "button").expect("button");
    assert_eq!(button.text.as_deref(), Some("Submit"));

    let anchor = elements.iter().find(|e| e.tag == "a").expect("anchor");
    assert_eq!(anchor.href.as_deref(), Some("/docs"));
    assert_eq!(anchor.text.as_deref(), Some("Docs"));
}

#[test]
fn disabled_input_is_visited_but_not_addressable() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");

    let input = result
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.tag_name == "input")
        .expect("input visited");
    assert!(input.is_visible);
    assert_eq!(input.highlight_index, None);
}

#[test]
fn viewport_expansion_gates_offscreen_elements() {
    let doc = sample_document();

    let gated = walk_document(&doc, &config(0)).expect("walk");
    let offscreen = gated
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.xpath.contains("button[2]"))
        .expect("offscreen button visited");
    assert_eq!(offscreen.highlight_index, None);

    let unlimited = walk_document(&doc, &config(-1)).expect("walk");
    let offscreen = unlimited
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.xpath.contains("button[2]"))
        .expect("offscreen button visited");
    assert!(offscreen.highlight_index.is_some());
}

#[test]
fn repeated_walks_are_identical() {
    let doc = sample_document();
    let first = walk_document(&doc, &config(0)).expect("walk");
    let second = walk_document(&doc, &config(0)).expect("walk");
    assert_eq!(first.snapshot.root_id, second.snapshot.root_id);
    assert_eq!(first.snapshot.map, second.snapshot.map);
}

#[test]
fn snapshot_serializes_with_tagged_records() {
    let doc = sample_document();
    let result = walk_document(&doc, &config(0)).expect("walk");

    let value = serde_json::to_value(&result.snapshot).expect("serialize");
    assert!(value["rootId"].is_string());

    let map = value["map"].as_object().expect("map object");
    let mut saw_element = false;
    let mut saw_text = false;
    for record in map.values() {
        match record["kind"].as_str() {
            Some("element") => {
                saw_element = true;
                assert!(record["tagName"].is_string());
                // absent index is omitted, not serialized as null
                if let Some(index) = record.get("highlightIndex") {
                    assert!(index.is_number());
                }
            }
            Some("text") => {
                saw_text = true;
                assert!(record["text"].is_string());
                assert!(record["isVisible"].is_boolean());
            }
            other => panic!("unexpected record kind: {:?}", other),
        }
    }
    assert!(saw_element && saw_text);

    // and the round trip preserves the map
    let back: Snapshot = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back.map, result.snapshot.map);
}
