//! Page information and form analysis tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::content::{
    accessibility_report, analyze_forms, extract_page_metadata, page_dimensions, page_performance,
    seo_report,
};
use crate::manager::BrowserManager;

use super::{Tool, ToolDefinition, ToolError, ToolResult};

fn default_sections() -> Vec<String> {
    vec!["seo".to_string(), "metadata".to_string()]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPageInfoParams {
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
}

/// Page metadata, structure, accessibility, and SEO information.
pub struct GetPageInfoTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl GetPageInfoTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_get_page_info",
                "Get Page Info",
                "Get page metadata, SEO, accessibility, and performance information",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {
                    "sections": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["seo", "accessibility", "performance", "metadata"]
                        },
                        "description": "Sections to include in the analysis (default: [\"seo\", \"metadata\"])"
                    }
                }
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for GetPageInfoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: GetPageInfoParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let session = self.manager.active_session().await?;

        let dimensions = page_dimensions(&session)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        let mut output = json!({
            "url": session.get_url().await.unwrap_or_default(),
            "title": session.get_title().await.unwrap_or_default(),
            "dimensions": dimensions,
        });

        for section in &params.sections {
            let value = match section.as_str() {
                "metadata" => extract_page_metadata(&session)
                    .await
                    .map(|m| serde_json::to_value(m).unwrap_or_default()),
                "seo" => seo_report(&session)
                    .await
                    .map(|r| serde_json::to_value(r).unwrap_or_default()),
                "accessibility" => accessibility_report(&session)
                    .await
                    .map(|r| serde_json::to_value(r).unwrap_or_default()),
                "performance" => {
                    let load_time = navigation_load_time(&self.manager).await.unwrap_or(0);
                    page_performance(&session, load_time)
                        .await
                        .map(|p| serde_json::to_value(p).unwrap_or_default())
                }
                other => {
                    warn!("Unknown page info section: {}", other);
                    continue;
                }
            };
            match value {
                Ok(value) => output[section.as_str()] = value,
                Err(e) => warn!("Section {} failed: {}", section, e),
            }
        }

        Ok(ToolResult::success_json("Page info collected", output))
    }
}

/// Load time of the last navigation, from the Navigation Timing API.
async fn navigation_load_time(manager: &BrowserManager) -> Option<u64> {
    let value = manager
        .evaluate(
            "(() => { const e = performance.getEntriesByType('navigation')[0]; return e ? Math.round(e.duration) : 0; })()",
        )
        .await
        .ok()?;
    value.as_u64()
}

/// Analyze all forms on the page with detailed input information.
pub struct AnalyzeFormsTool {
    definition: ToolDefinition,
    manager: Arc<BrowserManager>,
}

impl AnalyzeFormsTool {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "page_analyze_forms",
                "Analyze Forms",
                "Analyze all forms on the page with detailed input information",
            )
            .with_parameters_schema(json!({
                "type": "object",
                "properties": {}
            })),
            manager,
        }
    }
}

#[async_trait]
impl Tool for AnalyzeFormsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let session = self.manager.active_session().await?;
        let forms = analyze_forms(&session)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        let count = forms.len();

        Ok(ToolResult::success_json(
            format!("{} forms found", count),
            json!({ "count": count, "forms": forms }),
        ))
    }
}
