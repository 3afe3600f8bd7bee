//! Screenshot tool: breakpoint viewports with capture metadata.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::cdp::ScreenshotFormat;
use crate::manager::BrowserManager;

use super::interaction::{InteractAction, run_action};
use super::{Tool, ToolDefinition, ToolError, ToolResult, default_true};

fn default_breakpoints() -> Vec<u32> {
    vec![375, 768, 1280]
}

fn default_quality() -> u8 {
    80
}

fn default_format() -> ScreenshotFormat {
    ScreenshotFormat::Jpeg
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotPlusParams {
    pub name: String,
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<u32>,
    pub selector: Option<String>,
    #[serde(default = "default_true")]
    pub full_page: bool,
    #[serde(default = "default_format")]
    pub format: ScreenshotFormat,
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub actions: Vec<InteractAction>,
}

/// Take screenshots across breakpoint viewports with capture metadata.
pub struct ScreenshotPlusTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ScreenshotPlusTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_screenshot_plus",
                "Screenshot Plus",
                "Take screenshots across breakpoint viewports with detailed capture metadata",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name for the screenshot(s)" },
                    "breakpoints": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Viewport widths for screenshots (default: [375, 768, 1280])"
                    },
                    "selector": { "type": "string", "description": "CSS selector for element to screenshot (optional)" },
                    "fullPage": { "type": "boolean", "description": "Capture full page height (default: true)" },
                    "format": { "type": "string", "enum": ["png", "jpeg", "webp"], "description": "Image format (default: jpeg)" },
                    "quality": { "type": "number", "description": "JPEG/WebP quality 0-100 (default: 80)" },
                    "actions": {
                        "type": "array",
                        "items": { "type": "object" },
                        "description": "Actions to perform before each capture"
                    }
                },
                "required": ["name"]
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ScreenshotPlusTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: ScreenshotPlusParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;
        let height = self.manager.config().viewport_height;

        let mut shots = Vec::new();
        for &width in &params.breakpoints {
            session
                .set_viewport(width, height)
                .await
                .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

            for action in &params.actions {
                if let Err(e) = run_action(&session, action).await {
                    warn!("Pre-capture action {} failed: {}", action.kind(), e);
                }
            }

            let clip = match params.selector.as_deref() {
                Some(selector) => Some(
                    session
                        .element_clip(selector)
                        .await
                        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
                ),
                None => None,
            };

            let data = session
                .screenshot(params.format, Some(params.quality), params.full_page, clip)
                .await
                .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

            let byte_size = base64::engine::general_purpose::STANDARD
                .decode(&data)
                .map(|bytes| bytes.len())
                .unwrap_or(0);

            debug!("Captured {}px screenshot ({} bytes)", width, byte_size);
            shots.push(json!({
                "name": format!("{}_{}px", params.name, width),
                "viewport": { "width": width, "height": height },
                "format": params.format,
                "fullPage": params.full_page,
                "byteSize": byte_size,
                "data": data,
            }));
        }

        session
            .clear_viewport()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        Ok(ToolResult::success_json(
            format!("{} screenshots captured", shots.len()),
            json!({ "screenshots": shots }),
        ))
    }
}
