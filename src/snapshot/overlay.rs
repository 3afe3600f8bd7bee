//! Highlight overlay: optional visual boxes over highlighted elements.
//!
//! Drawing is a separate routine from the build and nothing depends on it
//! running; cleanup is independently invokable and also removes any cleanup
//! callbacks pages may have registered.

use serde_json::json;
use tracing::debug;

use crate::cdp::{CdpError, PageSession};

use super::HIGHLIGHT_CONTAINER_ID;
use super::walker::HighlightBox;

const DRAW_SCRIPT: &str = r#"
    const containerId = args.containerId;
    let container = document.getElementById(containerId);
    if (container) container.remove();
    container = document.createElement('div');
    container.id = containerId;
    container.style.cssText =
        'position:fixed;top:0;left:0;width:0;height:0;z-index:2147483646;pointer-events:none;';
    for (const box of args.boxes) {
        const outline = document.createElement('div');
        const focused = box.index === args.focusIndex;
        outline.style.cssText =
            'position:fixed;box-sizing:border-box;pointer-events:none;' +
            'left:' + box.x + 'px;top:' + box.y + 'px;' +
            'width:' + box.width + 'px;height:' + box.height + 'px;' +
            'border:2px solid ' + (focused ? '#ff4444' : '#4488ff') + ';';
        const label = document.createElement('span');
        label.textContent = String(box.index);
        label.style.cssText =
            'position:absolute;top:-2px;left:-2px;padding:0 3px;' +
            'font:10px/14px monospace;color:#fff;' +
            'background:' + (focused ? '#ff4444' : '#4488ff') + ';';
        outline.appendChild(label);
        container.appendChild(outline);
    }
    document.body.appendChild(container);
    return args.boxes.length;
"#;

const CLEAR_SCRIPT: &str = r#"
    const container = document.getElementById(args.containerId);
    if (container) container.remove();
    if (window._highlightCleanupFunctions && window._highlightCleanupFunctions.length) {
        for (const fn of window._highlightCleanupFunctions) {
            try { fn(); } catch (e) {}
        }
        window._highlightCleanupFunctions = [];
    }
    return true;
"#;

/// Draw index-labelled boxes for the given highlights.
pub async fn draw_highlights(
    session: &PageSession,
    boxes: &[HighlightBox],
    focus_index: i32,
) -> Result<(), CdpError> {
    let boxes_json: Vec<_> = boxes
        .iter()
        .map(|b| {
            json!({
                "index": b.index,
                "x": b.rect.x,
                "y": b.rect.y,
                "width": b.rect.width,
                "height": b.rect.height,
            })
        })
        .collect();

    let args = json!({
        "containerId": HIGHLIGHT_CONTAINER_ID,
        "boxes": boxes_json,
        "focusIndex": focus_index,
    });

    session.evaluate_function(DRAW_SCRIPT, &args).await?;
    debug!("Drew {} highlight boxes", boxes.len());
    Ok(())
}

/// Remove the overlay container and run registered cleanup callbacks.
pub async fn clear_highlights(session: &PageSession) -> Result<(), CdpError> {
    let args = json!({ "containerId": HIGHLIGHT_CONTAINER_ID });
    session.evaluate_function(CLEAR_SCRIPT, &args).await?;
    Ok(())
}
