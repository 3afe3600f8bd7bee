//! Content extraction tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::content::{
    ContentFormat, content_summary_markdown, extract_structured, page_html, page_text,
    structure_analysis,
};
use crate::manager::BrowserManager;

use super::{Tool, ToolDefinition, ToolError, ToolResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractContentParams {
    pub selector: Option<String>,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default)]
    pub output_format: ContentFormat,
    pub include_analysis: Option<bool>,
}

/// Extract structured content from the page with format options.
pub struct ExtractContentTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl ExtractContentTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_extract_content",
                "Extract Content",
                "Extract structured content from the page with format options",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "selector": { "type": "string", "description": "CSS selector to extract from (optional, defaults to full page)" },
                    "includeHidden": { "type": "boolean", "description": "Include hidden elements (default: false)" },
                    "outputFormat": {
                        "type": "string",
                        "enum": ["markdown", "html", "plain-text", "structured-json"],
                        "description": "Output format for the content (default: markdown)"
                    },
                    "includeAnalysis": { "type": "boolean", "description": "Include structure analysis (default: true for structured-json, false otherwise)" }
                }
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for ExtractContentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: ExtractContentParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;
        let selector = params.selector.as_deref();
        let include_analysis = params
            .include_analysis
            .unwrap_or(params.output_format == ContentFormat::StructuredJson);

        let mut output = json!({
            "outputFormat": params.output_format,
        });
        if let Some(selector) = selector {
            output["selector"] = json!(selector);
        }

        match params.output_format {
            ContentFormat::Html => {
                let html = page_html(&session, selector)
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                output["content"] = json!(html);
            }
            ContentFormat::PlainText => {
                let text = page_text(&session, selector)
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                output["content"] = json!(text);
            }
            ContentFormat::Markdown | ContentFormat::StructuredJson => {
                let content = extract_structured(&session, selector, params.include_hidden)
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

                if include_analysis {
                    output["analysis"] = serde_json::to_value(structure_analysis(&content))
                        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                }

                output["content"] = match params.output_format {
                    ContentFormat::Markdown => json!(content_summary_markdown(&content)),
                    _ => serde_json::to_value(content)
                        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?,
                };
            }
        }

        Ok(ToolResult::success_json("Content extracted", output))
    }
}
