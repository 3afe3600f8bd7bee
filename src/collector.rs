//! Page error collection.
//!
//! Listens to a page session's CDP event stream and accumulates JavaScript
//! exceptions, console messages, and network failures while tools run.
//! Collection is best-effort: it never fails the enclosing operation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cdp::{CdpResponse, PageSession};

/// Where an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Javascript,
    Console,
    Network,
    Security,
}

/// Severity of a collected entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Error,
    Warning,
    Info,
}

/// One collected page error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub level: ErrorLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate view of collected errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_logs: usize,
    pub has_javascript_errors: bool,
    pub has_network_errors: bool,
    pub has_console_logs: bool,
}

/// Collects page errors from a session's event stream.
pub struct ErrorCollector {
    errors: Arc<Mutex<Vec<PageError>>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ErrorCollector {
    /// Start collecting events from the session.
    ///
    /// Each session's event stream can be drained by one collector; starting
    /// a second collector on the same session yields one that stays empty.
    pub fn start(session: &PageSession) -> Self {
        let errors: Arc<Mutex<Vec<PageError>>> = Arc::new(Mutex::new(Vec::new()));

        let task = session.take_events().map(|mut rx| {
            let errors = errors.clone();
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    if let Some(error) = classify_event(&event) {
                        errors.lock().push(error);
                    }
                }
            })
        });

        if task.is_none() {
            debug!("Session event stream already taken; collector will stay empty");
        }

        Self { errors, task }
    }

    /// Stop listening. Collected errors remain readable.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Everything collected so far.
    pub fn errors(&self) -> Vec<PageError> {
        self.errors.lock().clone()
    }

    /// Counts and per-kind flags over the collected entries.
    pub fn summary(&self) -> ErrorSummary {
        let errors = self.errors.lock();

        let level = |l: ErrorLevel| errors.iter().filter(move |e| e.level == l);

        ErrorSummary {
            total_errors: level(ErrorLevel::Error).count(),
            total_warnings: level(ErrorLevel::Warning).count(),
            total_logs: level(ErrorLevel::Info).count(),
            has_javascript_errors: level(ErrorLevel::Error)
                .any(|e| e.kind == ErrorKind::Javascript),
            has_network_errors: level(ErrorLevel::Error).any(|e| e.kind == ErrorKind::Network),
            has_console_logs: level(ErrorLevel::Info).any(|e| e.kind == ErrorKind::Console),
        }
    }

    /// Drop everything collected so far.
    pub fn clear(&self) {
        self.errors.lock().clear();
    }
}

impl Drop for ErrorCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map a CDP event to a page error, if it represents one.
fn classify_event(event: &CdpResponse) -> Option<PageError> {
    let method = event.method.as_deref()?;
    let params = event.params.as_ref()?;

    match method {
        "Runtime.exceptionThrown" => {
            let details = &params["exceptionDetails"];
            let message = details["exception"]["description"]
                .as_str()
                .or_else(|| details["text"].as_str())
                .unwrap_or("Unknown exception")
                .to_string();
            Some(PageError {
                kind: ErrorKind::Javascript,
                level: ErrorLevel::Error,
                message,
                source: details["url"].as_str().map(String::from),
                url: None,
                line: details["lineNumber"].as_i64(),
                column: details["columnNumber"].as_i64(),
                status_code: None,
                timestamp: Utc::now(),
            })
        }
        "Runtime.consoleAPICalled" => {
            let level = match params["type"].as_str().unwrap_or("") {
                "error" | "assert" => ErrorLevel::Error,
                "warning" | "warn" => ErrorLevel::Warning,
                _ => ErrorLevel::Info,
            };
            Some(PageError {
                kind: ErrorKind::Console,
                level,
                message: console_message(&params["args"]),
                source: params["stackTrace"]["callFrames"][0]["url"]
                    .as_str()
                    .map(String::from),
                url: None,
                line: params["stackTrace"]["callFrames"][0]["lineNumber"].as_i64(),
                column: params["stackTrace"]["callFrames"][0]["columnNumber"].as_i64(),
                status_code: None,
                timestamp: Utc::now(),
            })
        }
        "Log.entryAdded" => {
            let entry = &params["entry"];
            let level = match entry["level"].as_str().unwrap_or("") {
                "error" => ErrorLevel::Error,
                "warning" => ErrorLevel::Warning,
                _ => ErrorLevel::Info,
            };
            let kind = match entry["source"].as_str().unwrap_or("") {
                "network" => ErrorKind::Network,
                "security" => ErrorKind::Security,
                _ => ErrorKind::Console,
            };
            Some(PageError {
                kind,
                level,
                message: entry["text"].as_str().unwrap_or("").to_string(),
                source: entry["url"].as_str().map(String::from),
                url: None,
                line: entry["lineNumber"].as_i64(),
                column: None,
                status_code: None,
                timestamp: Utc::now(),
            })
        }
        "Network.responseReceived" => {
            let response = &params["response"];
            let status = response["status"].as_i64().unwrap_or(0);
            // 304 Not Modified is fine
            if (200..400).contains(&status) || status == 304 || status == 0 {
                return None;
            }
            let level = if status >= 500 {
                ErrorLevel::Error
            } else {
                ErrorLevel::Warning
            };
            Some(PageError {
                kind: ErrorKind::Network,
                level,
                message: format!(
                    "HTTP {} {}",
                    status,
                    response["statusText"].as_str().unwrap_or("")
                ),
                source: None,
                url: response["url"].as_str().map(String::from),
                line: None,
                column: None,
                status_code: Some(status),
                timestamp: Utc::now(),
            })
        }
        "Network.loadingFailed" => {
            let error_text = params["errorText"].as_str().unwrap_or("Loading failed");
            let kind = if error_text.contains("CORS") {
                ErrorKind::Security
            } else {
                ErrorKind::Network
            };
            Some(PageError {
                kind,
                level: ErrorLevel::Error,
                message: error_text.to_string(),
                source: None,
                url: params["blockedReason"].as_str().map(String::from),
                line: None,
                column: None,
                status_code: None,
                timestamp: Utc::now(),
            })
        }
        _ => None,
    }
}

/// Join console call arguments into one readable line.
fn console_message(args: &Value) -> String {
    let parts: Vec<String> = args
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|arg| {
                    arg["value"]
                        .as_str()
                        .map(String::from)
                        .or_else(|| arg["description"].as_str().map(String::from))
                        .unwrap_or_else(|| arg["value"].to_string())
                })
                .collect()
        })
        .unwrap_or_default();
    parts.join(" ")
}
