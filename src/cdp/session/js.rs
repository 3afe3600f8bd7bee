//! JavaScript execution operations for CDP page session.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate JavaScript expression.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = Self::exception_text(exception);
            return Err(CdpError::JavaScript(text));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Evaluate a function body with a single JSON argument.
    ///
    /// The expression is wrapped in an IIFE so injected scripts can use
    /// `return` and keep their internals out of page globals.
    pub async fn evaluate_function(&self, body: &str, arg: &Value) -> Result<Value, CdpError> {
        let arg_json = serde_json::to_string(arg)?;
        let expression = format!("(function(args) {{\n{}\n}})({})", body, arg_json);
        self.evaluate(&expression).await
    }

    /// Extract a readable message from CDP exceptionDetails.
    fn exception_text(exception: &Value) -> String {
        if let Some(desc) = exception["exception"]["description"].as_str() {
            return desc.to_string();
        }
        exception["text"].as_str().unwrap_or("Unknown error").to_string()
    }
}
