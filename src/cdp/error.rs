//! CDP error types.

use thiserror::Error;

/// Errors surfaced by the CDP client and its page sessions.
///
/// Only conditions this transport actually produces: connection and
/// discovery failures, command-level errors from the browser, and the
/// evaluate/navigation/selector failures of the session operations.
#[derive(Debug, Error)]
pub enum CdpError {
    /// The WebSocket connection to the browser could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// No Chrome is listening on the debug endpoint.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    /// WebSocket transport error mid-session.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The browser answered a command with an error object.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// A command or reply could not be serialized or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The /json discovery endpoint failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// `Page.navigate` reported a failure.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// No element matched the selector.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Script evaluation threw inside the page.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A command or wait exceeded its deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The reply channel dropped: the target closed or detached.
    #[error("Session closed")]
    SessionClosed,

    /// The browser replied with data in an unexpected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}
