//! Screenshot capture for CDP page session.

use serde_json::json;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{ScreenshotFormat, Viewport};

use super::core::PageSession;

impl PageSession {
    /// Take a screenshot, returned as base64 image data.
    pub async fn screenshot(
        &self,
        format: ScreenshotFormat,
        quality: Option<u8>,
        full_page: bool,
        clip: Option<Viewport>,
    ) -> Result<String, CdpError> {
        let mut params = json!({
            "format": format,
            "captureBeyondViewport": full_page,
        });

        // Chrome rejects quality for png
        if format != ScreenshotFormat::Png {
            if let Some(q) = quality {
                params["quality"] = json!(q);
            }
        }

        if let Some(c) = clip {
            params["clip"] = serde_json::to_value(c)?;
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;

        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }

    /// Bounding rect of the first element matching a selector, as a clip.
    pub async fn element_clip(&self, selector: &str) -> Result<Viewport, CdpError> {
        let probe = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return null;
                const r = el.getBoundingClientRect();
                return {{x: r.left + window.scrollX, y: r.top + window.scrollY, width: r.width, height: r.height}};
            }})()"#,
            sel = serde_json::to_string(selector)?
        );

        let value = self.evaluate(&probe).await?;
        if value.is_null() {
            return Err(CdpError::ElementNotFound(selector.to_string()));
        }

        Ok(Viewport {
            x: value["x"].as_f64().unwrap_or(0.0),
            y: value["y"].as_f64().unwrap_or(0.0),
            width: value["width"].as_f64().unwrap_or(0.0),
            height: value["height"].as_f64().unwrap_or(0.0),
            scale: 1.0,
        })
    }
}
