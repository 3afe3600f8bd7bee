//! Snapshot tools: interactive-element listing and overlay cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::manager::BrowserManager;
use crate::snapshot::{SnapshotConfig, clear_highlights, extract_interactive_elements};

use super::{Tool, ToolDefinition, ToolError, ToolResult};

/// Build a DOM interaction snapshot and return the addressable elements.
pub struct SnapshotTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl SnapshotTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_snapshot",
                "Page Snapshot",
                "Build a DOM interaction snapshot and list the elements an agent can click or type into, each with a stable index",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "showHighlightElements": { "type": "boolean", "description": "Draw numbered boxes over the elements (default: false)" },
                    "viewportExpansion": { "type": "number", "description": "Pixels beyond the viewport to include; -1 for the whole page (default: 0)" },
                    "focusHighlightIndex": { "type": "number", "description": "Index to emphasize in the overlay (default: -1)" },
                    "debugMode": { "type": "boolean", "description": "Include build statistics (default: false)" }
                }
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for SnapshotTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let config: SnapshotConfig = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let snapshot = self.manager.snapshot(&config).await?;
        let elements = extract_interactive_elements(&snapshot);
        let count = elements.len();

        let mut output = json!({
            "count": count,
            "elements": elements,
        });
        if config.debug_mode {
            output["rootId"] = json!(snapshot.root_id);
            output["nodeCount"] = json!(snapshot.len());
        }

        Ok(ToolResult::success_json(
            format!("{} interactive elements", count),
            output,
        ))
    }
}

/// Remove the highlight overlay drawn by a previous snapshot.
pub struct ClearHighlightsTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ClearHighlightsTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_clear_highlights",
                "Clear Highlights",
                "Remove highlight overlay boxes drawn by page_snapshot",
            ),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ClearHighlightsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let session = self.manager.active_session().await?;
        clear_highlights(&session)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(ToolResult::success("Highlights cleared"))
    }
}
