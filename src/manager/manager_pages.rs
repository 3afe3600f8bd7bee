//! BrowserManager page management and interaction methods.

use std::sync::Arc;

use tracing::debug;

use crate::cdp::{PageSession, ScreenshotFormat, Viewport};
use crate::snapshot::{
    InteractiveElement, Snapshot, SnapshotConfig, build_snapshot, extract_interactive_elements,
};

use super::manager_core::PageState;
use super::{BrowserError, BrowserManager};

impl BrowserManager {
    /// Create a new page and navigate to URL. The new page becomes active.
    pub async fn new_page(&self, url: &str) -> Result<String, BrowserError> {
        self.ensure_connected().await?;
        let client = self.client().await?;

        let session = client.new_page(Some(url)).await?;

        let page_id = {
            let mut counter = self.page_counter.write().await;
            *counter += 1;
            format!("page_{}", *counter)
        };

        self.pages.write().await.insert(
            page_id.clone(),
            PageState {
                session: Arc::new(session),
                url: url.to_string(),
            },
        );
        *self.active_page.write().await = Some(page_id.clone());

        debug!("Created page {}: {}", page_id, url);
        Ok(page_id)
    }

    /// The page tools act on by default, created on demand.
    pub async fn ensure_page(&self) -> Result<String, BrowserError> {
        if let Some(page_id) = self.active_page.read().await.clone() {
            if self.pages.read().await.contains_key(&page_id) {
                return Ok(page_id);
            }
        }
        self.new_page("about:blank").await
    }

    /// Session for the active page.
    pub async fn active_session(&self) -> Result<Arc<PageSession>, BrowserError> {
        let page_id = self.ensure_page().await?;
        self.get_session(&page_id).await
    }

    /// Close a page.
    pub async fn close_page(&self, page_id: &str) -> Result<(), BrowserError> {
        let state = self.pages.write().await.remove(page_id);
        if let Some(state) = state {
            let client = self.client().await?;
            client.close_page(state.session.target_id()).await?;
        }

        let mut active = self.active_page.write().await;
        if active.as_deref() == Some(page_id) {
            *active = None;
        }

        debug!("Closed page {}", page_id);
        Ok(())
    }

    /// List all open pages.
    pub async fn list_pages(&self) -> Vec<String> {
        self.pages.read().await.keys().cloned().collect()
    }

    /// Navigate the active page to URL.
    pub async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let page_id = self.ensure_page().await?;
        let session = self.get_session(&page_id).await?;
        session.navigate(url).await?;

        if let Some(state) = self.pages.write().await.get_mut(&page_id) {
            state.url = url.to_string();
        }

        debug!("Navigated {} to {}", page_id, url);
        Ok(())
    }

    /// Get current URL of the active page.
    pub async fn get_url(&self) -> Result<String, BrowserError> {
        let session = self.active_session().await?;
        Ok(session.get_url().await?)
    }

    /// Get title of the active page.
    pub async fn get_title(&self) -> Result<String, BrowserError> {
        let session = self.active_session().await?;
        Ok(session.get_title().await?)
    }

    /// Take screenshot of the active page.
    pub async fn screenshot(
        &self,
        full_page: bool,
        format: ScreenshotFormat,
        quality: Option<u8>,
        clip: Option<Viewport>,
    ) -> Result<String, BrowserError> {
        let session = self.active_session().await?;
        Ok(session.screenshot(format, quality, full_page, clip).await?)
    }

    /// Get HTML content of the active page.
    pub async fn get_content(&self) -> Result<String, BrowserError> {
        let session = self.active_session().await?;
        Ok(session.get_content().await?)
    }

    /// Execute JavaScript on the active page.
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value, BrowserError> {
        let session = self.active_session().await?;
        Ok(session.evaluate(script).await?)
    }

    /// Build a DOM interaction snapshot of the active page.
    pub async fn snapshot(&self, config: &SnapshotConfig) -> Result<Snapshot, BrowserError> {
        let session = self.active_session().await?;
        Ok(build_snapshot(&session, config).await?)
    }

    /// Interactive elements of the active page, from a fresh snapshot.
    pub async fn interactive_elements(
        &self,
        config: &SnapshotConfig,
    ) -> Result<Vec<InteractiveElement>, BrowserError> {
        let snapshot = self.snapshot(config).await?;
        Ok(extract_interactive_elements(&snapshot))
    }
}
