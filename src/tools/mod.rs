//! Browser tools exposed over the JSON-RPC server.
//!
//! Each tool is a struct holding its definition and a shared
//! [`BrowserManager`], executing JSON params into a [`ToolResult`].

mod content;
mod elements;
mod interaction;
mod navigation;
mod page;
mod screenshot;

pub use content::ExtractContentTool;
pub use elements::{ClearHighlightsTool, SnapshotTool};
pub use interaction::{BatchInteractTool, ClickTool, FillTool, InteractAction, Position};
pub use navigation::NavigateAnalyzeTool;
pub use page::{AnalyzeFormsTool, GetPageInfoTool};
pub use screenshot::ScreenshotPlusTool;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::manager::{BrowserError, BrowserManager};

/// Tool execution errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<BrowserError> for ToolError {
    fn from(e: BrowserError) -> Self {
        ToolError::ExecutionFailed(e.to_string())
    }
}

/// Definition of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique identifier for the tool.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of what the tool does.
    pub description: String,
    /// JSON Schema for the parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_schema: Option<serde_json::Value>,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            parameters_schema: None,
        }
    }

    /// Set the parameters schema.
    pub fn with_parameters_schema(mut self, schema: serde_json::Value) -> Self {
        self.parameters_schema = Some(schema);
        self
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// Output content.
    pub content: String,
    /// Structured output (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<serde_json::Value>,
    /// Error message if execution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result with text content.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            structured_output: None,
            error: None,
        }
    }

    /// Create a successful result with structured output.
    pub fn success_json(content: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            success: true,
            content: content.into(),
            structured_output: Some(output),
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            structured_output: None,
            error: Some(error.into()),
        }
    }
}

/// A tool callable through the server.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError>;
}

/// Tools keyed by id.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Registry with every browser tool registered.
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(NavigateAnalyzeTool::new(manager.clone())),
            Arc::new(SnapshotTool::new(manager.clone())),
            Arc::new(ClearHighlightsTool::new(manager.clone())),
            Arc::new(ScreenshotPlusTool::new(manager.clone())),
            Arc::new(ExtractContentTool::new(manager.clone())),
            Arc::new(GetPageInfoTool::new(manager.clone())),
            Arc::new(AnalyzeFormsTool::new(manager.clone())),
            Arc::new(BatchInteractTool::new(manager.clone())),
            Arc::new(ClickTool::new(manager.clone())),
            Arc::new(FillTool::new(manager)),
        ];

        let mut map = HashMap::new();
        let mut order = Vec::new();
        for tool in tools {
            let id = tool.definition().id.clone();
            order.push(id.clone());
            map.insert(id, tool);
        }

        Self { tools: map, order }
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|id| self.tools.get(id))
            .map(|t| t.definition().clone())
            .collect()
    }

    /// Execute a tool by id.
    pub async fn execute(
        &self,
        id: &str,
        params: serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(id)
            .ok_or_else(|| ToolError::NotFound(id.to_string()))?;
        tool.execute(params).await
    }
}

// Shared default value helpers used by multiple submodules.

pub(crate) fn default_timeout() -> u64 {
    30000
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
