//! Stdio JSON-RPC server exposing the tool registry.
//!
//! Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout: `initialize`,
//! `tools/list`, and `tools/call`. Logging goes to stderr so stdout stays
//! a clean protocol channel.

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

use crate::tools::{ToolError, ToolRegistry};

/// Server identity reported to clients.
const SERVER_NAME: &str = "pagescope";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Serve the registry over stdin/stdout until stdin closes.
pub async fn serve_stdio(registry: ToolRegistry) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = BufWriter::new(tokio::io::stdout());
    let mut lines = stdin.lines();

    info!("{} v{} serving on stdio", SERVER_NAME, SERVER_VERSION);

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let request: RpcRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Unparseable request: {}", e);
                write_response(
                    &mut stdout,
                    &error_response(Value::Null, -32700, &format!("Parse error: {}", e)),
                )
                .await?;
                continue;
            }
        };

        // notifications get no response
        let Some(id) = request.id.clone() else {
            debug!("Ignoring notification: {}", request.method);
            continue;
        };

        let response = handle_request(&registry, &request, id).await;
        write_response(&mut stdout, &response).await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

async fn handle_request(registry: &ToolRegistry, request: &RpcRequest, id: Value) -> Value {
    match request.method.as_str() {
        "initialize" => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "capabilities": { "tools": {} }
            }
        }),
        "tools/list" => {
            let tools: Vec<Value> = registry
                .definitions()
                .iter()
                .map(|def| {
                    json!({
                        "name": def.id,
                        "description": def.description,
                        "inputSchema": def.parameters_schema.clone()
                            .unwrap_or_else(|| json!({"type": "object", "properties": {}})),
                    })
                })
                .collect();
            json!({ "jsonrpc": "2.0", "id": id, "result": { "tools": tools } })
        }
        "tools/call" => {
            let name = request.params["name"].as_str().unwrap_or_default().to_string();
            let arguments = request.params["arguments"].clone();
            let arguments = if arguments.is_null() {
                json!({})
            } else {
                arguments
            };

            match registry.execute(&name, arguments).await {
                Ok(result) => {
                    let text = match &result.structured_output {
                        Some(output) => serde_json::to_string_pretty(output)
                            .unwrap_or_else(|_| result.content.clone()),
                        None => result.content.clone(),
                    };
                    json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": {
                            "content": [{ "type": "text", "text": text }],
                            "isError": !result.success
                        }
                    })
                }
                Err(ToolError::NotFound(name)) => {
                    error_response(id, -32601, &format!("Unknown tool: {}", name))
                }
                Err(ToolError::InvalidParameters(message)) => {
                    error_response(id, -32602, &message)
                }
                Err(ToolError::ExecutionFailed(message)) => error_response(id, -32000, &message),
            }
        }
        other => error_response(id, -32601, &format!("Unknown method: {}", other)),
    }
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}

async fn write_response(
    stdout: &mut BufWriter<tokio::io::Stdout>,
    response: &Value,
) -> std::io::Result<()> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{BrowserManager, BrowserManagerConfig};
    use std::sync::Arc;

    fn registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(BrowserManager::new(BrowserManagerConfig::default())))
    }

    #[tokio::test]
    async fn test_initialize() {
        let request = RpcRequest {
            id: Some(json!(1)),
            method: "initialize".to_string(),
            params: json!({}),
        };
        let response = handle_request(&registry(), &request, json!(1)).await;
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let request = RpcRequest {
            id: Some(json!(2)),
            method: "tools/list".to_string(),
            params: json!({}),
        };
        let response = handle_request(&registry(), &request, json!(2)).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "page_snapshot"));
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let request = RpcRequest {
            id: Some(json!(3)),
            method: "bogus".to_string(),
            params: json!({}),
        };
        let response = handle_request(&registry(), &request, json!(3)).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_unknown_tool_call() {
        let request = RpcRequest {
            id: Some(json!(4)),
            method: "tools/call".to_string(),
            params: json!({"name": "nope", "arguments": {}}),
        };
        let response = handle_request(&registry(), &request, json!(4)).await;
        assert_eq!(response["error"]["code"], -32601);
    }
}
