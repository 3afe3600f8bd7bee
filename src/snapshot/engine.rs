//! Snapshot build entry point.

use tracing::{debug, warn};

use crate::cdp::PageSession;

use super::capture::capture_document;
use super::overlay;
use super::types::{Snapshot, SnapshotConfig, SnapshotError};
use super::walker::walk_document;

/// Build a DOM interaction snapshot of the page.
///
/// One capture round-trip into the page, then a pure walk over the result.
/// Deterministic for an unchanged DOM and config. The returned snapshot is
/// a point-in-time copy: the page keeps running, so any later action
/// against a highlight index is best-effort and callers should re-snapshot
/// when an action fails.
pub async fn build_snapshot(
    session: &PageSession,
    config: &SnapshotConfig,
) -> Result<Snapshot, SnapshotError> {
    let raw = capture_document(session, config).await?;
    let result = walk_document(&raw, config)?;

    if config.show_highlight_elements {
        // the overlay is cosmetic: a failed draw never fails the build
        if let Err(e) =
            overlay::draw_highlights(session, &result.highlights, config.focus_highlight_index)
                .await
        {
            warn!("Highlight overlay draw failed: {}", e);
        }
    }

    debug!(
        nodes = result.snapshot.len(),
        highlights = result.highlights.len(),
        "Built DOM snapshot"
    );
    Ok(result.snapshot)
}
