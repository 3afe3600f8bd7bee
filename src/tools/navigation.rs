//! Navigate-and-analyze: one round trip from URL to a full page report.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::collector::ErrorCollector;
use crate::content::{
    ContentFormat, content_summary_markdown, extract_page_metadata, extract_structured, page_html,
    page_performance, page_text,
};
use crate::manager::BrowserManager;
use crate::snapshot::SnapshotConfig;

use super::{Tool, ToolDefinition, ToolError, ToolResult, default_timeout, default_true};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateAnalyzeParams {
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub content_format: ContentFormat,
    #[serde(default = "default_true")]
    pub include_metadata: bool,
    #[serde(default)]
    pub include_performance: bool,
}

/// Navigate to a URL and return metadata, content, collected errors, and
/// the interactive-element list.
pub struct NavigateAnalyzeTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl NavigateAnalyzeTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_navigate_analyze",
                "Navigate & Analyze",
                "Navigate to a URL and return page metadata, content in the requested format, collected errors, and interactive elements",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "The URL to navigate to" },
                    "timeoutMs": { "type": "number", "description": "Maximum navigation time in milliseconds (default: 30000)" },
                    "contentFormat": {
                        "type": "string",
                        "enum": ["markdown", "html", "plain-text", "structured-json"],
                        "description": "Format for the page content (default: markdown)"
                    },
                    "includeMetadata": { "type": "boolean", "description": "Include meta-tag metadata (default: true)" },
                    "includePerformance": { "type": "boolean", "description": "Include load time and resource counts (default: false)" }
                },
                "required": ["url"]
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for NavigateAnalyzeTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: NavigateAnalyzeParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;

        let mut collector = ErrorCollector::start(&session);

        let started = std::time::Instant::now();
        let navigation = tokio::time::timeout(
            std::time::Duration::from_millis(params.timeout_ms),
            session.navigate(&params.url),
        )
        .await;
        match navigation {
            Ok(result) => {
                result.map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
            }
            Err(_) => {
                return Err(ToolError::ExecutionFailed(format!(
                    "Navigation to {} timed out after {}ms",
                    params.url, params.timeout_ms
                )));
            }
        }
        let load_time_ms = started.elapsed().as_millis() as u64;

        let title = session.get_title().await.unwrap_or_default();
        let final_url = session.get_url().await.unwrap_or_else(|_| params.url.clone());

        let mut output = json!({
            "url": final_url,
            "title": title,
            "contentFormat": params.content_format,
        });

        if params.include_metadata {
            match extract_page_metadata(&session).await {
                Ok(metadata) => {
                    output["metadata"] = serde_json::to_value(metadata)
                        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                }
                Err(e) => warn!("Metadata extraction failed: {}", e),
            }
        }

        let content = match params.content_format {
            ContentFormat::Markdown => extract_structured(&session, None, false)
                .await
                .map(|c| json!(content_summary_markdown(&c))),
            ContentFormat::Html => page_html(&session, None).await.map(|h| json!(h)),
            ContentFormat::PlainText => page_text(&session, None).await.map(|t| json!(t)),
            ContentFormat::StructuredJson => extract_structured(&session, None, false)
                .await
                .and_then(|c| Ok(serde_json::to_value(c)?)),
        };
        match content {
            Ok(content) => output["content"] = content,
            Err(e) => warn!("Content extraction failed: {}", e),
        }

        if params.include_performance {
            match page_performance(&session, load_time_ms).await {
                Ok(perf) => {
                    output["performance"] = serde_json::to_value(perf)
                        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                }
                Err(e) => warn!("Performance analysis failed: {}", e),
            }
        }

        // a failed snapshot degrades the result, it never fails navigation
        match self
            .manager
            .interactive_elements(&SnapshotConfig::default())
            .await
        {
            Ok(elements) => {
                output["interactiveElements"] = serde_json::to_value(elements)
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
            }
            Err(e) => warn!("Snapshot build failed, continuing without it: {}", e),
        }

        collector.stop();
        output["errors"] = json!({
            "summary": collector.summary(),
            "entries": collector.errors(),
        });

        debug!("Analyzed {} in {}ms", params.url, load_time_ms);
        Ok(ToolResult::success_json(
            format!("Analyzed {}", params.url),
            output,
        ))
    }
}
