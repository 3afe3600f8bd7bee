use super::*;
use crate::snapshot::capture::RawHitCheck;
use crate::snapshot::geometry::{GeometryCache, ViewportWindow};
use crate::snapshot::testutil::DocBuilder;
use crate::snapshot::types::{ElementRecord, SnapshotConfig};

fn config(expansion: i32) -> SnapshotConfig {
    SnapshotConfig {
        viewport_expansion: expansion,
        ..Default::default()
    }
}

fn window(expansion: i32) -> ViewportWindow {
    ViewportWindow::new(1280.0, 720.0, expansion)
}

#[test]
fn test_top_element_unlimited_viewport() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    b.with(div, |n| n.hit_checks.clear());
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_top_element(&doc, div, &config(-1), &window(-1), &mut cache));
}

#[test]
fn test_top_element_hit_on_self() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_top_element(&doc, div, &config(0), &window(0), &mut cache));
}

#[test]
fn test_top_element_hit_on_descendant() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let outer = b.element("div", body);
    let inner = b.element("span", outer);
    // every checkpoint lands on the inner span; the outer div still owns it
    b.with(outer, |n| {
        n.hit_checks = vec![
            RawHitCheck {
                hit: Some(inner),
                threw: false,
            };
            3
        ];
    });
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_top_element(&doc, outer, &config(0), &window(0), &mut cache));
}

#[test]
fn test_top_element_occluded() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    let overlay = b.element("div", body);
    // an unrelated sibling overlay wins every checkpoint
    b.with(div, |n| {
        n.hit_checks = vec![
            RawHitCheck {
                hit: Some(overlay),
                threw: false,
            };
            3
        ];
    });
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(!is_top_element(&doc, div, &config(0), &window(0), &mut cache));
}

#[test]
fn test_top_element_lookup_threw_fails_open() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    b.with(div, |n| {
        n.hit_checks = vec![RawHitCheck {
            hit: None,
            threw: true,
        }];
    });
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_top_element(&doc, div, &config(0), &window(0), &mut cache));
}

#[test]
fn test_top_element_no_usable_rect() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    b.at_y(div, 5000.0);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(!is_top_element(&doc, div, &config(0), &window(0), &mut cache));
}

#[test]
fn test_foreign_document_always_top() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let iframe = b.element("iframe", body);
    let inner = b.element("div", iframe);
    b.with(inner, |n| {
        n.in_main_document = false;
        n.hit_checks.clear();
    });
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_top_element(&doc, inner, &config(0), &window(0), &mut cache));
}

#[test]
fn test_shadow_scoped_center_sample() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let host = b.element("div", body);
    let inner = b.element("span", host);
    b.with(host, |n| n.has_shadow_root = true);
    b.with(inner, |n| {
        n.in_shadow_root = true;
        // center sample hits a sibling: occluded within the shadow root
        n.hit_checks = vec![RawHitCheck {
            hit: Some(host),
            threw: false,
        }];
    });
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(!is_top_element(&doc, inner, &config(0), &window(0), &mut cache));
}

#[test]
fn test_distinct_interaction_button() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    let button = b.element("button", div);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_element_distinct_interaction(&doc, button, &mut cache));
}

#[test]
fn test_distinct_interaction_test_id() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    b.attr(div, "data-testid", "submit-row");
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_element_distinct_interaction(&doc, div, &mut cache));
}

#[test]
fn test_plain_span_not_distinct() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    let span = b.element("span", div);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(!is_element_distinct_interaction(&doc, span, &mut cache));
}

#[test]
fn test_heuristic_requires_container_and_children() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let toolbar = b.element("div", body);
    b.attr(toolbar, "class", "toolbar");
    let entry = b.element("div", toolbar);
    b.attr(entry, "class", "entry");
    let label = b.element("span", entry);
    let _ = label;
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(is_heuristically_interactive(&doc, entry, &mut cache));

    // same shape with no visible children fails
    let mut b = DocBuilder::new();
    let body = b.body();
    let toolbar = b.element("div", body);
    b.attr(toolbar, "class", "toolbar");
    let entry = b.element("div", toolbar);
    b.attr(entry, "class", "entry");
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    assert!(!is_heuristically_interactive(&doc, entry, &mut cache));
}

#[test]
fn test_heuristic_rejects_top_level_wrapper() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let wrapper = b.element("div", body);
    b.attr(wrapper, "class", "menu");
    let child = b.element("div", wrapper);
    let _ = child;
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    // direct child of body never qualifies
    assert!(!is_heuristically_interactive(&doc, wrapper, &mut cache));
}

#[test]
fn test_handle_highlighting_assigns_dense_indices() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let first = b.element("button", body);
    let second = b.element("button", body);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    let cfg = config(0);
    let win = window(0);
    let mut next = 0u32;

    let mut rec_a = ElementRecord::new("button", "body/button[1]");
    rec_a.is_interactive = true;
    assert!(handle_highlighting(
        &mut rec_a, &doc, first, false, &cfg, &win, &mut cache, &mut next
    ));
    let mut rec_b = ElementRecord::new("button", "body/button[2]");
    rec_b.is_interactive = true;
    assert!(handle_highlighting(
        &mut rec_b, &doc, second, false, &cfg, &win, &mut cache, &mut next
    ));

    assert_eq!(rec_a.highlight_index, Some(0));
    assert_eq!(rec_b.highlight_index, Some(1));
    assert_eq!(next, 2);
}

#[test]
fn test_handle_highlighting_absorbs_nested_decoration() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let div = b.element("div", body);
    let span = b.element("span", div);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    let cfg = config(0);
    let win = window(0);
    let mut next = 0u32;

    let mut rec = ElementRecord::new("span", "body/div/span");
    rec.is_interactive = true;
    // parent already highlighted and the span is not a distinct interaction
    assert!(!handle_highlighting(
        &mut rec, &doc, span, true, &cfg, &win, &mut cache, &mut next
    ));
    assert_eq!(rec.highlight_index, None);
    assert_eq!(next, 0);
}

#[test]
fn test_handle_highlighting_viewport_gate() {
    let mut b = DocBuilder::new();
    let body = b.body();
    let button = b.element("button", body);
    b.at_y(button, 5000.0);
    let doc = b.finish();
    let mut cache = GeometryCache::new();
    let win = window(0);
    let mut next = 0u32;

    let mut rec = ElementRecord::new("button", "body/button");
    rec.is_interactive = true;
    assert!(!handle_highlighting(
        &mut rec, &doc, button, false, &config(0), &win, &mut cache, &mut next
    ));
    assert_eq!(rec.highlight_index, None);
    assert!(!rec.is_in_viewport);

    // unlimited viewport lifts the gate
    let mut cache = GeometryCache::new();
    let win = window(-1);
    let mut rec = ElementRecord::new("button", "body/button");
    rec.is_interactive = true;
    assert!(handle_highlighting(
        &mut rec, &doc, button, false, &config(-1), &win, &mut cache, &mut next
    ));
    assert_eq!(rec.highlight_index, Some(0));
}
