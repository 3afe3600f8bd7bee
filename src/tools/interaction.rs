//! Page interaction tools: batched actions plus thin click/fill wrappers.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::cdp::PageSession;
use crate::manager::{BrowserError, BrowserManager};

use super::{Tool, ToolDefinition, ToolError, ToolResult};

/// Scroll target position.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One interaction step.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InteractAction {
    Click {
        selector: String,
    },
    Type {
        selector: String,
        text: String,
    },
    Select {
        selector: String,
        value: String,
    },
    Hover {
        selector: String,
    },
    Wait {
        #[serde(default)]
        duration: u64,
    },
    WaitForSelector {
        selector: String,
        timeout: Option<u64>,
    },
    Scroll {
        position: Option<Position>,
        selector: Option<String>,
    },
    Clear {
        selector: String,
    },
    Press {
        key: String,
        selector: Option<String>,
    },
}

impl InteractAction {
    /// Short name for result reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            InteractAction::Click { .. } => "click",
            InteractAction::Type { .. } => "type",
            InteractAction::Select { .. } => "select",
            InteractAction::Hover { .. } => "hover",
            InteractAction::Wait { .. } => "wait",
            InteractAction::WaitForSelector { .. } => "waitForSelector",
            InteractAction::Scroll { .. } => "scroll",
            InteractAction::Clear { .. } => "clear",
            InteractAction::Press { .. } => "press",
        }
    }
}

/// Execute one action against a page session.
pub(crate) async fn run_action(
    session: &PageSession,
    action: &InteractAction,
) -> Result<(), BrowserError> {
    match action {
        InteractAction::Click { selector } => {
            let (x, y) = session.element_center(selector).await?;
            session.click(x, y).await?;
        }
        InteractAction::Type { selector, text } => {
            session.focus_selector(selector).await?;
            session.type_text(text).await?;
        }
        InteractAction::Select { selector, value } => {
            let script = format!(
                r#"(() => {{
                    const el = document.querySelector({sel});
                    if (!el) return false;
                    el.value = {val};
                    el.dispatchEvent(new Event('input', {{bubbles: true}}));
                    el.dispatchEvent(new Event('change', {{bubbles: true}}));
                    return true;
                }})()"#,
                sel = serde_json::to_string(selector).unwrap_or_default(),
                val = serde_json::to_string(value).unwrap_or_default(),
            );
            if session.evaluate(&script).await?.as_bool() != Some(true) {
                return Err(BrowserError::ElementNotFound(selector.clone()));
            }
        }
        InteractAction::Hover { selector } => {
            let (x, y) = session.element_center(selector).await?;
            session.mouse_move(x, y).await?;
        }
        InteractAction::Wait { duration } => {
            tokio::time::sleep(std::time::Duration::from_millis(*duration)).await;
        }
        InteractAction::WaitForSelector { selector, timeout } => {
            session.wait_for_selector(selector, *timeout).await?;
        }
        InteractAction::Scroll { position, selector } => match (position, selector) {
            (Some(position), _) => {
                let script = format!("window.scrollTo({}, {})", position.x, position.y);
                session.evaluate(&script).await?;
            }
            (None, Some(selector)) => {
                let script = format!(
                    "(() => {{ const el = document.querySelector({sel}); if (!el) return false; el.scrollIntoView({{block: 'center'}}); return true; }})()",
                    sel = serde_json::to_string(selector).unwrap_or_default(),
                );
                if session.evaluate(&script).await?.as_bool() != Some(true) {
                    return Err(BrowserError::ElementNotFound(selector.clone()));
                }
            }
            (None, None) => {
                session.evaluate("window.scrollBy(0, window.innerHeight)").await?;
            }
        },
        InteractAction::Clear { selector } => {
            session.focus_selector(selector).await?;
            session.press_key_combo("Control+a").await?;
            session.press_key("Backspace").await?;
        }
        InteractAction::Press { key, selector } => {
            if let Some(selector) = selector {
                session.focus_selector(selector).await?;
            }
            session.press_key(key).await?;
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInteractParams {
    pub actions: Vec<InteractAction>,
    #[serde(default)]
    pub stop_on_error: bool,
}

/// Execute a sequence of page interactions.
pub struct BatchInteractTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl BatchInteractTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_batch_interact",
                "Batch Interact",
                "Execute multiple page interactions in sequence",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "actions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["click", "type", "select", "hover", "wait", "waitForSelector", "scroll", "clear", "press"],
                                    "description": "Type of action to perform"
                                },
                                "selector": { "type": "string", "description": "CSS selector for the element" },
                                "text": { "type": "string", "description": "Text to type" },
                                "value": { "type": "string", "description": "Value for select action" },
                                "key": { "type": "string", "description": "Key to press" },
                                "duration": { "type": "number", "description": "Wait duration in ms" },
                                "timeout": { "type": "number", "description": "Timeout in ms" },
                                "position": {
                                    "type": "object",
                                    "properties": {
                                        "x": { "type": "number" },
                                        "y": { "type": "number" }
                                    },
                                    "description": "Scroll position"
                                }
                            },
                            "required": ["type"]
                        },
                        "description": "Array of actions to perform"
                    },
                    "stopOnError": { "type": "boolean", "description": "Stop execution on first error (default: false)" }
                },
                "required": ["actions"]
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for BatchInteractTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: BatchInteractParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;

        let mut results = Vec::new();
        let mut succeeded = 0usize;
        for (index, action) in params.actions.iter().enumerate() {
            let started = std::time::Instant::now();
            let outcome = run_action(&session, action).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => {
                    succeeded += 1;
                    results.push(json!({
                        "index": index,
                        "type": action.kind(),
                        "success": true,
                        "durationMs": duration_ms,
                    }));
                }
                Err(e) => {
                    debug!("Action {} ({}) failed: {}", index, action.kind(), e);
                    results.push(json!({
                        "index": index,
                        "type": action.kind(),
                        "success": false,
                        "error": e.to_string(),
                        "durationMs": duration_ms,
                    }));
                    if params.stop_on_error {
                        break;
                    }
                }
            }
        }

        let total = params.actions.len();
        Ok(ToolResult::success_json(
            format!("{}/{} actions succeeded", succeeded, total),
            json!({ "results": results }),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct ClickParams {
    pub selector: String,
}

/// Click an element on the page.
pub struct ClickTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ClickTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_click",
                "Click",
                "Click an element on the page",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "selector": { "type": "string", "description": "CSS selector for element to click" }
                },
                "required": ["selector"]
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ClickTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: ClickParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;
        run_action(
            &session,
            &InteractAction::Click {
                selector: params.selector.clone(),
            },
        )
        .await?;

        Ok(ToolResult::success(format!("Clicked: {}", params.selector)))
    }
}

#[derive(Debug, Deserialize)]
pub struct FillParams {
    pub selector: String,
    pub value: String,
}

/// Fill out an input field.
pub struct FillTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl FillTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_fill",
                "Fill",
                "Fill out an input field",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "selector": { "type": "string", "description": "CSS selector for input field" },
                    "value": { "type": "string", "description": "Value to fill" }
                },
                "required": ["selector", "value"]
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for FillTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: FillParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;
        run_action(
            &session,
            &InteractAction::Clear {
                selector: params.selector.clone(),
            },
        )
        .await?;
        run_action(
            &session,
            &InteractAction::Type {
                selector: params.selector.clone(),
                text: params.value.clone(),
            },
        )
        .await?;

        Ok(ToolResult::success(format!(
            "Filled {} with: {}",
            params.selector, params.value
        )))
    }
}
