//! Typed geometry and the per-build geometry cache.

use std::collections::HashMap;

use super::capture::{RawDocument, RawRect, RawStyle};

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Positive area on both axes.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<RawRect> for Rect {
    fn from(r: RawRect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

/// The computed-style subset the classifiers consult.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub cursor: String,
    pub position: String,
    pub opacity: String,
}

impl ComputedStyle {
    pub fn is_fixed_or_sticky(&self) -> bool {
        self.position == "fixed" || self.position == "sticky"
    }
}

impl From<&RawStyle> for ComputedStyle {
    fn from(s: &RawStyle) -> Self {
        Self {
            display: s.display.clone(),
            visibility: s.visibility.clone(),
            cursor: s.cursor.clone(),
            position: s.position.clone(),
            opacity: s.opacity.clone(),
        }
    }
}

/// The viewport window, optionally expanded by a margin.
///
/// `expansion == -1` disables the window entirely: everything is inside.
#[derive(Debug, Clone, Copy)]
pub struct ViewportWindow {
    pub width: f64,
    pub height: f64,
    pub expansion: i32,
}

impl ViewportWindow {
    pub fn new(width: f64, height: f64, expansion: i32) -> Self {
        Self {
            width,
            height,
            expansion,
        }
    }

    pub fn unlimited(&self) -> bool {
        self.expansion == -1
    }

    /// Whether a rect overlaps the expanded window.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        if self.unlimited() {
            return true;
        }
        let margin = f64::from(self.expansion);
        !(rect.bottom() < -margin
            || rect.y > self.height + margin
            || rect.right() < -margin
            || rect.x > self.width + margin)
    }
}

/// Per-build memoization of geometry queries keyed by arena index.
///
/// Lazily parses raw captures into typed values on first access and returns
/// the same value for repeated queries within one build. Cleared when the
/// build returns; never shared across builds.
#[derive(Debug, Default)]
pub struct GeometryCache {
    rects: HashMap<usize, Option<Rect>>,
    client_rects: HashMap<usize, Vec<Rect>>,
    styles: HashMap<usize, Option<ComputedStyle>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounding rect for a node.
    pub fn rect(&mut self, doc: &RawDocument, idx: usize) -> Option<Rect> {
        *self.rects.entry(idx).or_insert_with(|| {
            doc.node(idx).and_then(|n| n.rect).map(Rect::from)
        })
    }

    /// Client rects for a node (range rects for text nodes).
    pub fn client_rects(&mut self, doc: &RawDocument, idx: usize) -> &[Rect] {
        self.client_rects.entry(idx).or_insert_with(|| {
            doc.node(idx)
                .map(|n| n.client_rects.iter().copied().map(Rect::from).collect())
                .unwrap_or_default()
        })
    }

    /// Sampled computed style for a node.
    pub fn style(&mut self, doc: &RawDocument, idx: usize) -> Option<&ComputedStyle> {
        self.styles
            .entry(idx)
            .or_insert_with(|| {
                doc.node(idx)
                    .and_then(|n| n.style.as_ref())
                    .map(ComputedStyle::from)
            })
            .as_ref()
    }

    /// Drop every memoized entry, releasing node references.
    pub fn clear(&mut self) {
        self.rects.clear();
        self.client_rects.clear();
        self.styles.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rects.len() + self.client_rects.len() + self.styles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::capture::{RawNode, RawRect, RawStyle};

    fn doc_with_rect() -> RawDocument {
        RawDocument {
            nodes: vec![RawNode {
                rect: Some(RawRect {
                    x: 10.0,
                    y: 20.0,
                    width: 30.0,
                    height: 40.0,
                }),
                style: Some(RawStyle {
                    display: "block".into(),
                    visibility: "visible".into(),
                    cursor: "pointer".into(),
                    position: "static".into(),
                    opacity: "1".into(),
                }),
                ..Default::default()
            }],
            body: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_repeated_reads_identical() {
        let doc = doc_with_rect();
        let mut cache = GeometryCache::new();
        let first = cache.rect(&doc, 0);
        let second = cache.rect(&doc, 0);
        assert_eq!(first, second);
        assert_eq!(first.map(|r| r.bottom()), Some(60.0));
    }

    #[test]
    fn test_cache_clear_releases_entries() {
        let doc = doc_with_rect();
        let mut cache = GeometryCache::new();
        let _ = cache.rect(&doc, 0);
        let _ = cache.style(&doc, 0);
        assert!(cache.len() > 0);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_missing_node_yields_none() {
        let doc = RawDocument::default();
        let mut cache = GeometryCache::new();
        assert!(cache.rect(&doc, 7).is_none());
        assert!(cache.style(&doc, 7).is_none());
        assert!(cache.client_rects(&doc, 7).is_empty());
    }

    #[test]
    fn test_viewport_window_overlap() {
        let window = ViewportWindow::new(1000.0, 800.0, 0);
        let inside = Rect {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        };
        let below = Rect {
            x: 10.0,
            y: 5000.0,
            width: 50.0,
            height: 50.0,
        };
        assert!(window.overlaps(&inside));
        assert!(!window.overlaps(&below));

        let expanded = ViewportWindow::new(1000.0, 800.0, 5000);
        assert!(expanded.overlaps(&below));

        let unlimited = ViewportWindow::new(1000.0, 800.0, -1);
        assert!(unlimited.overlaps(&below));
    }
}
