//! Raw-document builders for engine tests.

use super::capture::{RawDocument, RawHitCheck, RawNode, RawNodeKind, RawRect, RawStyle, RawViewport};

pub(crate) const VIEWPORT_W: f64 = 1280.0;
pub(crate) const VIEWPORT_H: f64 = 720.0;

fn default_style() -> RawStyle {
    RawStyle {
        display: "block".into(),
        visibility: "visible".into(),
        cursor: "auto".into(),
        position: "static".into(),
        opacity: "1".into(),
    }
}

/// Builds a raw arena the way the capture script would, with sane visible
/// defaults so tests only state what they care about.
pub(crate) struct DocBuilder {
    nodes: Vec<RawNode>,
    body: Option<usize>,
    next_y: f64,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            body: None,
            next_y: 0.0,
        }
    }

    /// Push the body root. Must be called first.
    pub fn body(&mut self) -> usize {
        let rect = RawRect {
            x: 0.0,
            y: 0.0,
            width: VIEWPORT_W,
            height: VIEWPORT_H,
        };
        let idx = self.push(RawNode {
            kind: RawNodeKind::Element,
            tag: "body".into(),
            rect: Some(rect),
            client_rects: vec![rect],
            offset_width: VIEWPORT_W,
            offset_height: VIEWPORT_H,
            style: Some(default_style()),
            check_visibility: Some(true),
            in_main_document: true,
            ..Default::default()
        });
        self.body = Some(idx);
        idx
    }

    /// Push a visible element stacked below the previous one.
    pub fn element(&mut self, tag: &str, parent: usize) -> usize {
        let rect = RawRect {
            x: 0.0,
            y: self.next_y,
            width: 100.0,
            height: 20.0,
        };
        self.next_y += 30.0;
        let idx = self.push(RawNode {
            kind: RawNodeKind::Element,
            tag: tag.into(),
            parent: Some(parent),
            rect: Some(rect),
            client_rects: vec![rect],
            offset_width: 100.0,
            offset_height: 20.0,
            style: Some(default_style()),
            check_visibility: Some(true),
            in_main_document: true,
            ..Default::default()
        });
        // top of its own location unless a test overrides
        self.nodes[idx].hit_checks = vec![
            RawHitCheck {
                hit: Some(idx),
                threw: false,
            };
            3
        ];
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Push a text node under a parent element.
    pub fn text(&mut self, parent: usize, content: &str) -> usize {
        let rect = RawRect {
            x: 0.0,
            y: self.next_y,
            width: 80.0,
            height: 16.0,
        };
        let idx = self.push(RawNode {
            kind: RawNodeKind::Text,
            text: content.into(),
            parent: Some(parent),
            client_rects: vec![rect],
            check_visibility: Some(true),
            in_main_document: true,
            ..Default::default()
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Set an attribute.
    pub fn attr(&mut self, idx: usize, name: &str, value: &str) -> &mut Self {
        self.nodes[idx].attributes.insert(name.into(), value.into());
        self
    }

    /// Arbitrary mutation of a node.
    pub fn with(&mut self, idx: usize, f: impl FnOnce(&mut RawNode)) -> &mut Self {
        f(&mut self.nodes[idx]);
        self
    }

    /// Move an element's geometry to a given y offset.
    pub fn at_y(&mut self, idx: usize, y: f64) -> &mut Self {
        let node = &mut self.nodes[idx];
        if let Some(rect) = node.rect.as_mut() {
            rect.y = y;
        }
        for rect in &mut node.client_rects {
            rect.y = y;
        }
        self
    }

    /// Zero out an element's rendered size.
    pub fn zero_size(&mut self, idx: usize) -> &mut Self {
        let node = &mut self.nodes[idx];
        node.offset_width = 0.0;
        node.offset_height = 0.0;
        if let Some(rect) = node.rect.as_mut() {
            rect.width = 0.0;
            rect.height = 0.0;
        }
        node.client_rects.clear();
        node.hit_checks.clear();
        self
    }

    fn push(&mut self, node: RawNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn finish(self) -> RawDocument {
        RawDocument {
            nodes: self.nodes,
            body: self.body,
            viewport: RawViewport {
                width: VIEWPORT_W,
                height: VIEWPORT_H,
            },
        }
    }
}
