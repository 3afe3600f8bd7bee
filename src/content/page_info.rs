//! Page metadata, dimensions, performance, SEO and accessibility reports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cdp::{CdpError, PageSession};

/// Meta-tag derived page metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub og_tags: HashMap<String, String>,
    pub twitter_tags: HashMap<String, String>,
    pub other_meta: HashMap<String, String>,
}

/// Viewport and content dimensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageDimensions {
    pub viewport: Dimensions,
    pub content: Dimensions,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Coarse resource counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceCount {
    pub images: u64,
    pub scripts: u64,
    pub stylesheets: u64,
    pub total: u64,
}

/// Load-time and resource summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePerformance {
    pub load_time_ms: u64,
    pub resource_count: ResourceCount,
}

/// SEO-relevant page facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoReport {
    pub title: String,
    pub title_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub description_length: usize,
    pub h1_count: u64,
    pub has_canonical: bool,
    pub images_total: u64,
    pub images_with_alt: u64,
}

/// Accessibility-relevant page facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilityReport {
    pub images_without_alt: u64,
    pub inputs_without_labels: u64,
    pub has_main_landmark: bool,
    pub has_nav_landmark: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_lang: Option<String>,
}

const METADATA_SCRIPT: &str = r#"
    const metadata = {
        title: document.title || '',
        description: null,
        keywords: null,
        canonical: null,
        ogTags: {},
        twitterTags: {},
        otherMeta: {}
    };

    for (const tag of document.querySelectorAll('meta')) {
        const name = tag.getAttribute('name') || tag.getAttribute('property') || '';
        const content = tag.getAttribute('content') || '';
        if (!name || !content) continue;

        if (name === 'description') {
            metadata.description = content;
        } else if (name === 'keywords') {
            metadata.keywords = content;
        } else if (name.startsWith('og:')) {
            metadata.ogTags[name] = content;
        } else if (name.startsWith('twitter:')) {
            metadata.twitterTags[name] = content;
        } else {
            metadata.otherMeta[name] = content;
        }
    }

    const canonical = document.querySelector('link[rel="canonical"]');
    if (canonical) metadata.canonical = canonical.getAttribute('href');

    return metadata;
"#;

/// Extract page metadata from meta tags.
pub async fn extract_page_metadata(session: &PageSession) -> Result<PageMetadata, CdpError> {
    let value = session
        .evaluate_function(METADATA_SCRIPT, &json!({}))
        .await?;
    Ok(serde_json::from_value(value)?)
}

const DIMENSIONS_SCRIPT: &str = r#"
    return {
        viewport: { width: window.innerWidth, height: window.innerHeight },
        content: {
            width: Math.max(
                document.documentElement.scrollWidth,
                document.body ? document.body.scrollWidth : 0,
                document.documentElement.clientWidth
            ),
            height: Math.max(
                document.documentElement.scrollHeight,
                document.body ? document.body.scrollHeight : 0,
                document.documentElement.clientHeight
            )
        }
    };
"#;

/// Viewport and scrollable content dimensions.
pub async fn page_dimensions(session: &PageSession) -> Result<PageDimensions, CdpError> {
    let value = session
        .evaluate_function(DIMENSIONS_SCRIPT, &json!({}))
        .await?;
    Ok(serde_json::from_value(value)?)
}

const RESOURCE_SCRIPT: &str = r#"
    const images = document.querySelectorAll('img').length;
    const scripts = document.querySelectorAll('script').length;
    const stylesheets = document.querySelectorAll('link[rel="stylesheet"]').length;
    return { images: images, scripts: scripts, stylesheets: stylesheets, total: images + scripts + stylesheets };
"#;

/// Resource counts plus the measured load time.
pub async fn page_performance(
    session: &PageSession,
    load_time_ms: u64,
) -> Result<PagePerformance, CdpError> {
    let value = session
        .evaluate_function(RESOURCE_SCRIPT, &json!({}))
        .await?;
    let resource_count: ResourceCount = serde_json::from_value(value)?;
    Ok(PagePerformance {
        load_time_ms,
        resource_count,
    })
}

const SEO_SCRIPT: &str = r#"
    const description = document.querySelector('meta[name="description"]');
    const images = document.querySelectorAll('img');
    let withAlt = 0;
    for (const img of images) {
        if (img.getAttribute('alt')) withAlt++;
    }
    return {
        title: document.title || '',
        titleLength: (document.title || '').length,
        description: description ? description.getAttribute('content') : null,
        descriptionLength: description ? (description.getAttribute('content') || '').length : 0,
        h1Count: document.querySelectorAll('h1').length,
        hasCanonical: document.querySelector('link[rel="canonical"]') !== null,
        imagesTotal: images.length,
        imagesWithAlt: withAlt
    };
"#;

/// SEO facts: title/description lengths, h1 count, alt coverage, canonical.
pub async fn seo_report(session: &PageSession) -> Result<SeoReport, CdpError> {
    let value = session.evaluate_function(SEO_SCRIPT, &json!({})).await?;
    Ok(serde_json::from_value(value)?)
}

const ACCESSIBILITY_SCRIPT: &str = r#"
    let imagesWithoutAlt = 0;
    for (const img of document.querySelectorAll('img')) {
        if (!img.getAttribute('alt')) imagesWithoutAlt++;
    }
    let inputsWithoutLabels = 0;
    for (const input of document.querySelectorAll('input, select, textarea')) {
        if (input.type === 'hidden') continue;
        const id = input.getAttribute('id');
        const labelled = (id && document.querySelector('label[for="' + id + '"]'))
            || input.closest('label')
            || input.getAttribute('aria-label')
            || input.getAttribute('aria-labelledby');
        if (!labelled) inputsWithoutLabels++;
    }
    return {
        imagesWithoutAlt: imagesWithoutAlt,
        inputsWithoutLabels: inputsWithoutLabels,
        hasMainLandmark: document.querySelector('main, [role="main"]') !== null,
        hasNavLandmark: document.querySelector('nav, [role="navigation"]') !== null,
        htmlLang: document.documentElement.getAttribute('lang')
    };
"#;

/// Accessibility facts: alt coverage, labelling, landmarks, lang.
pub async fn accessibility_report(session: &PageSession) -> Result<AccessibilityReport, CdpError> {
    let value = session
        .evaluate_function(ACCESSIBILITY_SCRIPT, &json!({}))
        .await?;
    Ok(serde_json::from_value(value)?)
}
