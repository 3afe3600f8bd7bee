//! Navigation operations for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Navigate to URL.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();

        self.wait_for_load().await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for page load.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_secs(30);

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }

    /// Reload page.
    pub async fn reload(&self) -> Result<(), CdpError> {
        self.call("Page.reload", None).await?;
        self.wait_for_load().await?;
        Ok(())
    }

    /// Go back.
    pub async fn go_back(&self) -> Result<(), CdpError> {
        let history = self.call("Page.getNavigationHistory", None).await?;
        let current_index = history["currentIndex"].as_i64().unwrap_or(0);

        if current_index > 0 {
            if let Some(entries) = history["entries"].as_array() {
                if let Some(entry) = entries.get((current_index - 1) as usize) {
                    let entry_id = entry["id"].as_i64().unwrap_or(0);
                    self.call(
                        "Page.navigateToHistoryEntry",
                        Some(json!({"entryId": entry_id})),
                    )
                    .await?;
                    self.wait_for_load().await?;
                }
            }
        }
        Ok(())
    }

    /// Go forward.
    pub async fn go_forward(&self) -> Result<(), CdpError> {
        let history = self.call("Page.getNavigationHistory", None).await?;
        let current_index = history["currentIndex"].as_i64().unwrap_or(0);

        if let Some(entries) = history["entries"].as_array() {
            if (current_index as usize) < entries.len().saturating_sub(1) {
                if let Some(entry) = entries.get((current_index + 1) as usize) {
                    let entry_id = entry["id"].as_i64().unwrap_or(0);
                    self.call(
                        "Page.navigateToHistoryEntry",
                        Some(json!({"entryId": entry_id})),
                    )
                    .await?;
                    self.wait_for_load().await?;
                }
            }
        }
        Ok(())
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get page title.
    pub async fn get_title(&self) -> Result<String, CdpError> {
        let result = self.evaluate("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Wait for a selector to match, polling the page.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout_ms: Option<u64>,
    ) -> Result<(), CdpError> {
        let timeout = std::time::Duration::from_millis(timeout_ms.unwrap_or(30000));
        let start = std::time::Instant::now();
        let probe = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );

        loop {
            if self.evaluate(&probe).await?.as_bool() == Some(true) {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }

    /// Center of the first element matching a selector, in viewport coordinates.
    pub async fn element_center(&self, selector: &str) -> Result<(f64, f64), CdpError> {
        let probe = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return null;
                el.scrollIntoView({{block: 'center', inline: 'center'}});
                const r = el.getBoundingClientRect();
                return {{x: r.left + r.width / 2, y: r.top + r.height / 2}};
            }})()"#,
            sel = serde_json::to_string(selector)?
        );

        let value = self.evaluate(&probe).await?;
        if value.is_null() {
            return Err(CdpError::ElementNotFound(selector.to_string()));
        }

        let x = value["x"].as_f64().unwrap_or(0.0);
        let y = value["y"].as_f64().unwrap_or(0.0);
        Ok((x, y))
    }

    /// Focus the first element matching a selector.
    pub async fn focus_selector(&self, selector: &str) -> Result<(), CdpError> {
        let probe = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.focus();
                return true;
            }})()"#,
            sel = serde_json::to_string(selector)?
        );

        if self.evaluate(&probe).await?.as_bool() != Some(true) {
            return Err(CdpError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }
}
