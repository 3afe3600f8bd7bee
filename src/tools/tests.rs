use std::sync::Arc;

use super::{navigation, screenshot};
use super::*;
use crate::manager::{BrowserManager, BrowserManagerConfig};

fn registry() -> ToolRegistry {
    let manager = Arc::new(BrowserManager::new(BrowserManagerConfig::default()));
    ToolRegistry::new(manager)
}

#[test]
fn test_registry_lists_all_tools() {
    let registry = registry();
    let ids: Vec<String> = registry.definitions().iter().map(|d| d.id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            "page_navigate_analyze",
            "page_snapshot",
            "page_clear_highlights",
            "page_screenshot_plus",
            "page_extract_content",
            "page_get_page_info",
            "page_analyze_forms",
            "page_batch_interact",
            "page_click",
            "page_fill",
        ]
    );
}

#[tokio::test]
async fn test_unknown_tool_rejected() {
    let registry = registry();
    let result = registry
        .execute("page_does_not_exist", serde_json::json!({}))
        .await;
    assert!(matches!(result, Err(ToolError::NotFound(_))));
}

#[test]
fn test_tool_result_constructors() {
    let ok = ToolResult::success("done");
    assert!(ok.success);
    assert_eq!(ok.content, "done");
    assert!(ok.error.is_none());

    let err = ToolResult::error("boom");
    assert!(!err.success);
    assert_eq!(err.error.as_deref(), Some("boom"));
}

#[test]
fn test_definition_schema_attach() {
    let def = ToolDefinition::new("t", "T", "a tool")
        .with_parameters_schema(serde_json::json!({"type": "object"}));
    assert!(def.parameters_schema.is_some());
}

#[test]
fn test_interact_action_deserialize() {
    let action: InteractAction =
        serde_json::from_value(serde_json::json!({"type": "click", "selector": "#go"})).unwrap();
    assert_eq!(action.kind(), "click");

    let action: InteractAction = serde_json::from_value(
        serde_json::json!({"type": "waitForSelector", "selector": ".done", "timeout": 5000}),
    )
    .unwrap();
    assert_eq!(action.kind(), "waitForSelector");

    let action: InteractAction =
        serde_json::from_value(serde_json::json!({"type": "scroll", "position": {"x": 0, "y": 400}}))
            .unwrap();
    assert_eq!(action.kind(), "scroll");
}

#[test]
fn test_interact_action_unknown_type_rejected() {
    let result: Result<InteractAction, _> =
        serde_json::from_value(serde_json::json!({"type": "teleport"}));
    assert!(result.is_err());
}

#[test]
fn test_navigate_params_defaults() {
    let params: navigation::NavigateAnalyzeParams =
        serde_json::from_value(serde_json::json!({"url": "https://example.com"})).unwrap();
    assert_eq!(params.timeout_ms, 30000);
    assert!(params.include_metadata);
    assert!(!params.include_performance);
}

#[test]
fn test_screenshot_params_defaults() {
    let params: screenshot::ScreenshotPlusParams =
        serde_json::from_value(serde_json::json!({"name": "home"})).unwrap();
    assert_eq!(params.breakpoints, vec![375, 768, 1280]);
    assert!(params.full_page);
    assert_eq!(params.quality, 80);
    assert!(params.actions.is_empty());
}

#[test]
fn test_tool_error_from_browser_error() {
    let err: ToolError = crate::manager::BrowserError::NotConnected.into();
    assert!(matches!(err, ToolError::ExecutionFailed(_)));
}
