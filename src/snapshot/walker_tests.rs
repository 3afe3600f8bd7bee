use super::*;
use crate::snapshot::capture::{RawDocument, RawHitCheck};
use crate::snapshot::testutil::DocBuilder;
use crate::snapshot::types::{ElementRecord, NodeRecord, Snapshot, SnapshotConfig, SnapshotError};

fn config(expansion: i32) -> SnapshotConfig {
    SnapshotConfig {
        viewport_expansion: expansion,
        ..Default::default()
    }
}

fn walk(doc: &RawDocument, cfg: &SnapshotConfig) -> WalkResult {
    walk_document(doc, cfg).expect("walk succeeds")
}

fn highlight_indices(snapshot: &Snapshot) -> Vec<u32> {
    let mut indices: Vec<u32> = snapshot
        .map
        .values()
        .filter_map(NodeRecord::highlight_index)
        .collect();
    indices.sort_unstable();
    indices
}

fn find_by_tag<'a>(snapshot: &'a Snapshot, tag: &str) -> Option<&'a ElementRecord> {
    snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.tag_name == tag)
}

#[test]
fn test_button_highlighted_disabled_input_not() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let button = b.element("button", body);
    b.text(button, "Submit");
    let input = b.element("input", body);
    b.attr(input, "disabled", "");
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    assert_eq!(highlight_indices(&result.snapshot), vec![0]);

    let button_rec = find_by_tag(&result.snapshot, "button").unwrap();
    assert_eq!(button_rec.highlight_index, Some(0));

    // the disabled input is still visited, just not addressable
    let input_rec = find_by_tag(&result.snapshot, "input").unwrap();
    assert_eq!(input_rec.highlight_index, None);
    assert!(input_rec.is_visible);
    assert!(!input_rec.is_interactive);
}

#[test]
fn test_onclick_wrapper_absorbs_plain_span() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    b.attr(div, "onclick", "go()");
    let span = b.element("span", div);
    b.text(span, "Click me");
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    let div_rec = find_by_tag(&result.snapshot, "div").unwrap();
    let span_rec = find_by_tag(&result.snapshot, "span").unwrap();
    assert_eq!(div_rec.highlight_index, Some(0));
    assert_eq!(span_rec.highlight_index, None);
    assert_eq!(highlight_indices(&result.snapshot), vec![0]);
}

#[test]
fn test_menu_container_and_items_all_highlighted() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let backdrop = b.element("div", body);
    let menu = b.element("div", body);
    b.attr(menu, "role", "menu");
    for _ in 0..3 {
        let item = b.element("div", menu);
        b.attr(item, "role", "menuitem");
    }
    // an unrelated backdrop wins every checkpoint of the container; the
    // menu role still makes it a highlight candidate
    b.with(menu, |n| {
        n.hit_checks = vec![
            RawHitCheck {
                hit: Some(backdrop),
                threw: false,
            };
            3
        ];
    });
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    assert_eq!(highlight_indices(&result.snapshot), vec![0, 1, 2, 3]);

    let menu_rec = result
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.attributes.get("role").map(String::as_str) == Some("menu"))
        .unwrap();
    assert!(!menu_rec.is_top_element);
    assert_eq!(menu_rec.highlight_index, Some(0));
}

#[test]
fn test_empty_anchor_without_href_dropped() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let anchor = b.element("a", body);
    b.zero_size(anchor);
    let doc = b.finish();

    // unlimited viewport so the cheap reject does not hide the prune rule
    let result = walk(&doc, &config(-1));
    assert!(find_by_tag(&result.snapshot, "a").is_none());

    let body_rec = find_by_tag(&result.snapshot, "body").unwrap();
    assert!(body_rec.children.is_empty());
}

#[test]
fn test_sized_anchor_without_href_kept() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let _anchor = b.element("a", body);
    let doc = b.finish();

    let result = walk(&doc, &config(-1));
    assert!(find_by_tag(&result.snapshot, "a").is_some());
}

#[test]
fn test_offscreen_element_gated_by_viewport_expansion() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let button = b.element("button", body);
    b.at_y(button, 5000.0);
    let doc = b.finish();

    let gated = walk(&doc, &config(0));
    let rec = find_by_tag(&gated.snapshot, "button").unwrap();
    assert_eq!(rec.highlight_index, None);

    let unlimited = walk(&doc, &config(-1));
    let rec = find_by_tag(&unlimited.snapshot, "button").unwrap();
    assert_eq!(rec.highlight_index, Some(0));
}

#[test]
fn test_indices_dense_and_in_document_order() {
    let mut b = DocBuilder::new();
    let body = b.body();
    for _ in 0..4 {
        let btn = b.element("button", body);
        let _ = btn;
    }
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    assert_eq!(highlight_indices(&result.snapshot), vec![0, 1, 2, 3]);

    // document order: xpath sibling positions line up with indices
    let mut by_index: Vec<(u32, String)> = result
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .filter_map(|el| el.highlight_index.map(|i| (i, el.xpath.clone())))
        .collect();
    by_index.sort_by_key(|(i, _)| *i);
    let xpaths: Vec<String> = by_index.into_iter().map(|(_, x)| x).collect();
    assert_eq!(
        xpaths,
        vec![
            "body/button[1]",
            "body/button[2]",
            "body/button[3]",
            "body/button[4]"
        ]
    );
}

#[test]
fn test_no_dangling_children() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let script = b.element("script", body);
    b.text(script, "var x = 1;");
    let div = b.element("div", body);
    b.text(div, "   ");
    let anchor = b.element("a", div);
    b.zero_size(anchor);
    let doc = b.finish();

    let result = walk(&doc, &config(-1));
    for record in result.snapshot.map.values() {
        for child in record.children() {
            assert!(
                result.snapshot.map.contains_key(child),
                "dangling child id {child}"
            );
        }
    }
    // and the filtered nodes are simply absent
    assert!(find_by_tag(&result.snapshot, "script").is_none());
    assert!(find_by_tag(&result.snapshot, "a").is_none());
}

#[test]
fn test_walk_is_idempotent() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let button = b.element("button", body);
    b.text(button, "Go");
    let div = b.element("div", body);
    b.attr(div, "role", "menu");
    let doc = b.finish();

    let first = walk(&doc, &config(0));
    let second = walk(&doc, &config(0));
    assert_eq!(first.snapshot.root_id, second.snapshot.root_id);
    assert_eq!(first.snapshot.map, second.snapshot.map);
}

#[test]
fn test_no_highlight_on_invisible_records() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let button = b.element("button", body);
    b.with(button, |n| {
        if let Some(style) = n.style.as_mut() {
            style.visibility = "hidden".into();
        }
    });
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    for el in result.snapshot.map.values().filter_map(NodeRecord::as_element) {
        if el.highlight_index.is_some() {
            assert!(el.is_visible);
        }
    }
    let rec = find_by_tag(&result.snapshot, "button").unwrap();
    assert_eq!(rec.highlight_index, None);
}

#[test]
fn test_shadow_root_children_walked_and_flagged() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let host = b.element("div", body);
    b.attr(host, "onclick", "open()");
    let inner = b.element("button", host);
    // rewire: button lives in the shadow root, not the light DOM
    b.with(host, |n| {
        n.children.clear();
        n.shadow_children.push(inner);
        n.has_shadow_root = true;
    });
    b.with(inner, |n| n.in_shadow_root = true);
    let doc = b.finish();

    let result = walk(&doc, &config(-1));
    let host_rec = find_by_tag(&result.snapshot, "div").unwrap();
    assert!(host_rec.shadow_root);
    assert_eq!(host_rec.highlight_index, Some(0));

    // the shadow button is a distinct interaction under a highlighted host
    let button_rec = find_by_tag(&result.snapshot, "button").unwrap();
    assert_eq!(button_rec.highlight_index, Some(1));
}

#[test]
fn test_iframe_children_reset_highlight_flag() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let wrapper = b.element("div", body);
    b.attr(wrapper, "onclick", "track()");
    let iframe = b.element("iframe", wrapper);
    let frame_body = b.element("body", iframe);
    let frame_div = b.element("div", frame_body);
    b.attr(frame_div, "onclick", "inner()");
    // rewire into frame structure
    b.with(iframe, |n| {
        n.children.clear();
        n.frame_children.push(frame_body);
    });
    b.with(frame_body, |n| {
        n.in_main_document = false;
        n.hit_checks.clear();
    });
    b.with(frame_div, |n| {
        n.in_main_document = false;
        n.hit_checks.clear();
    });
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    // the frame div restarts with a clear ancestor flag, so it highlights
    // even though the wrapper outside the frame already did
    let frame_div_rec = result
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.tag_name == "div" && el.attributes.get("onclick").map(String::as_str) == Some("inner()"))
        .unwrap();
    assert!(frame_div_rec.highlight_index.is_some());
}

#[test]
fn test_inaccessible_iframe_skipped_without_failing() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let iframe = b.element("iframe", body);
    b.with(iframe, |n| n.frame_denied = true);
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    let iframe_rec = find_by_tag(&result.snapshot, "iframe").unwrap();
    assert!(iframe_rec.children.is_empty());
}

#[test]
fn test_editable_region_absorbs_internal_structure() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let wrapper = b.element("div", body);
    b.attr(wrapper, "onclick", "focusEditor()");
    let editor = b.element("div", wrapper);
    b.attr(editor, "contenteditable", "true");
    b.with(editor, |n| n.is_content_editable = true);
    let inner = b.element("span", editor);
    // looks clickable only via cursor; inside the editable region it is
    // internal structure, not a separate control
    b.with(inner, |n| {
        if let Some(style) = n.style.as_mut() {
            style.cursor = "pointer".into();
        }
    });
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    let editor_rec = result
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .find(|el| el.attributes.get("contenteditable").map(String::as_str) == Some("true"))
        .unwrap();
    // the editable div is distinct under its highlighted wrapper
    assert!(editor_rec.highlight_index.is_some());

    let span_rec = find_by_tag(&result.snapshot, "span").unwrap();
    assert_eq!(span_rec.highlight_index, None);
}

#[test]
fn test_structural_deny_list() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let _svg = b.element("svg", body);
    let _style = b.element("style", body);
    let section = b.element("section", body);
    let _ = section;
    let doc = b.finish();

    let result = walk(&doc, &config(-1));
    assert!(find_by_tag(&result.snapshot, "svg").is_none());
    assert!(find_by_tag(&result.snapshot, "style").is_none());
    assert!(find_by_tag(&result.snapshot, "section").is_some());
}

#[test]
fn test_cheap_reject_keeps_fixed_elements() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let toast = b.element("div", body);
    b.zero_size(toast);
    b.with(toast, |n| {
        n.rect = Some(crate::snapshot::capture::RawRect {
            x: 0.0,
            y: 9000.0,
            width: 0.0,
            height: 0.0,
        });
        if let Some(style) = n.style.as_mut() {
            style.position = "fixed".into();
        }
    });
    let gone = b.element("div", body);
    b.zero_size(gone);
    b.with(gone, |n| {
        n.rect = Some(crate::snapshot::capture::RawRect {
            x: 0.0,
            y: 9000.0,
            width: 0.0,
            height: 0.0,
        });
    });
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    let divs = result
        .snapshot
        .map
        .values()
        .filter_map(NodeRecord::as_element)
        .filter(|el| el.tag_name == "div")
        .count();
    // the fixed toast survives the prune, the plain one does not
    assert_eq!(divs, 1);
}

#[test]
fn test_overlay_container_skipped() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let overlay = b.element("div", body);
    b.attr(overlay, "id", crate::snapshot::HIGHLIGHT_CONTAINER_ID);
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    assert!(find_by_tag(&result.snapshot, "div").is_none());
}

#[test]
fn test_attribute_capture_policy() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let plain = b.element("p", body);
    b.attr(plain, "class", "prose");
    let link = b.element("a", body);
    b.attr(link, "href", "/x");
    b.attr(link, "class", "nav");
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    let p_rec = find_by_tag(&result.snapshot, "p").unwrap();
    assert!(p_rec.attributes.is_empty());
    let a_rec = find_by_tag(&result.snapshot, "a").unwrap();
    assert_eq!(a_rec.attributes.get("href").map(String::as_str), Some("/x"));
}

#[test]
fn test_highlight_boxes_match_assignments() {
    let mut b = DocBuilder::new();
    let body = b.body();
    b.element("button", body);
    b.element("button", body);
    let doc = b.finish();

    let result = walk(&doc, &config(0));
    assert_eq!(result.highlights.len(), 2);
    let mut box_indices: Vec<u32> = result.highlights.iter().map(|h| h.index).collect();
    box_indices.sort_unstable();
    assert_eq!(box_indices, highlight_indices(&result.snapshot));
}

#[test]
fn test_missing_body_is_an_error() {
    let doc = RawDocument::default();
    assert!(matches!(
        walk_document(&doc, &config(0)),
        Err(SnapshotError::MissingBody)
    ));
}
