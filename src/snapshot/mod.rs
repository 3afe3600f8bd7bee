//! DOM interaction snapshot engine.
//!
//! Turns a live page into a disconnected, serializable map of nodes, with a
//! dense highlight index assigned to every element an agent may target. The
//! build is one atomic capture pass inside the page followed by a pure walk
//! in Rust:
//!
//! 1. [`capture`] — an embedded script flattens the DOM (light children,
//!    open shadow roots, same-origin iframes) into a raw arena of
//!    observations: geometry, sampled styles, attributes, hit-test samples.
//! 2. [`walker`] — drives the classifiers over the arena: visibility and
//!    viewport ([`visibility`]), the ordered interactivity rule cascade
//!    ([`interactivity`]), and top-element / distinct-interaction
//!    resolution ([`resolver`]), accumulating [`NodeRecord`]s.
//! 3. extraction ([`extract_interactive_elements`]) — flattens the finished
//!    snapshot into the ordered interactive-element list.
//!
//! Geometry queries go through a per-build [`geometry::GeometryCache`],
//! cleared before the build returns. Nothing is shared across builds.

pub mod capture;
mod engine;
mod extract;
pub mod geometry;
pub mod interactivity;
mod overlay;
pub mod resolver;
mod types;
pub mod visibility;
pub mod walker;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::build_snapshot;
pub use extract::extract_interactive_elements;
pub use overlay::{clear_highlights, draw_highlights};
pub use types::{
    ElementRecord, InteractiveElement, NodeRecord, Snapshot, SnapshotConfig, SnapshotError,
    TextRecord,
};

/// Element id of the overlay container injected by [`draw_highlights`];
/// the walker skips it so the overlay never snapshots itself.
pub const HIGHLIGHT_CONTAINER_ID: &str = "pagescope-highlight-container";
