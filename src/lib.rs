//! Browser perception and automation toolkit for LLM agents.
//!
//! Drives a real Chrome/Chromium instance via the Chrome DevTools Protocol
//! (CDP) and turns a live page into data an agent can act on. The heart of
//! the crate is the DOM interaction snapshot engine: a single-pass walk over
//! the rendered document that decides which elements are visible, which are
//! actually interactive, which are the top-most hit target at their
//! location, and assigns each addressable element a stable index the agent
//! can click or type against.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  Rust backend   │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │  (user's browser)│
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! One evaluate round-trip captures the raw document state (geometry,
//! styles, hit-test samples); every classification heuristic then runs in
//! Rust over that capture. The resulting [`Snapshot`] is a disconnected,
//! serializable copy with no live binding back to the page.
//!
//! ## Setup
//!
//! Start Chrome with remote debugging enabled, or let the
//! [`BrowserManager`] launch one:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! ## Tools
//!
//! The `pagescope` binary serves these over stdio JSON-RPC:
//! - `page_navigate_analyze` - Navigate and return metadata, content,
//!   errors, and interactive elements
//! - `page_snapshot` - Build a DOM interaction snapshot
//! - `page_screenshot_plus` - Screenshots across breakpoint viewports
//! - `page_extract_content` - Structured content extraction
//! - `page_get_page_info` - SEO / accessibility / performance / metadata
//! - `page_analyze_forms` - Form and input inventory
//! - `page_batch_interact` - Sequential click/type/scroll/wait actions

pub mod cdp;
pub mod collector;
pub mod content;
pub mod manager;
pub mod server;
pub mod snapshot;
pub mod tools;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use collector::{ErrorCollector, ErrorSummary, PageError};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use snapshot::{
    InteractiveElement, NodeRecord, Snapshot, SnapshotConfig, SnapshotError,
    build_snapshot, extract_interactive_elements,
};
