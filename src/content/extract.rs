//! Structured content extraction and format rendering.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cdp::{CdpError, PageSession};

/// Output format for extracted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentFormat {
    #[default]
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "plain-text")]
    PlainText,
    #[serde(rename = "structured-json")]
    StructuredJson,
}

/// One heading with its level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// A link with a little surrounding context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkInfo {
    pub text: String,
    pub href: String,
    pub context: String,
}

/// An image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub title: String,
}

/// Table cells as extracted; rendering happens Rust-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Structured page content from one extraction pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedContent {
    pub title: String,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub links: Vec<LinkInfo>,
    pub images: Vec<ImageInfo>,
    pub tables: Vec<TableData>,
}

/// Element counts and outline for the structure-analysis block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureAnalysis {
    pub heading_count: usize,
    pub paragraph_count: usize,
    pub link_count: usize,
    pub image_count: usize,
    pub table_count: usize,
    pub outline: Vec<String>,
}

const EXTRACT_SCRIPT: &str = r#"
    const scope = args.selector ? document.querySelector(args.selector) : document.body;
    if (!scope) return null;
    const includeHidden = args.includeHidden;

    function isShown(el) {
        if (includeHidden) return true;
        const style = window.getComputedStyle(el);
        return style.display !== 'none' && style.visibility !== 'hidden';
    }
    function clean(text) {
        return (text || '').replace(/\s+/g, ' ').trim();
    }

    const content = {
        title: document.title || 'Untitled',
        headings: [],
        paragraphs: [],
        links: [],
        images: [],
        tables: []
    };

    for (const heading of scope.querySelectorAll('h1, h2, h3, h4, h5, h6')) {
        if (!isShown(heading)) continue;
        content.headings.push({
            level: parseInt(heading.tagName.substring(1), 10),
            text: clean(heading.textContent)
        });
    }

    for (const p of scope.querySelectorAll('p')) {
        if (!isShown(p)) continue;
        const text = clean(p.textContent);
        if (text) content.paragraphs.push(text);
    }

    for (const a of scope.querySelectorAll('a[href]')) {
        if (!isShown(a)) continue;
        const context = a.parentElement ? clean(a.parentElement.textContent).substring(0, 100) : '';
        content.links.push({
            text: clean(a.textContent),
            href: a.href,
            context: context
        });
    }

    for (const img of scope.querySelectorAll('img')) {
        content.images.push({
            src: img.src || '',
            alt: img.alt || '',
            title: img.title || ''
        });
    }

    for (const table of scope.querySelectorAll('table')) {
        if (!isShown(table)) continue;
        const rows = Array.from(table.querySelectorAll('tr'));
        if (rows.length === 0) continue;
        const headers = Array.from(rows[0].querySelectorAll('th, td')).map(c => clean(c.textContent));
        if (headers.length === 0) continue;
        const body = [];
        for (let i = 1; i < rows.length; i++) {
            body.push(Array.from(rows[i].querySelectorAll('td')).map(c => clean(c.textContent)));
        }
        content.tables.push({ headers: headers, rows: body });
    }

    return content;
"#;

/// Extract structured content, optionally scoped to a selector.
pub async fn extract_structured(
    session: &PageSession,
    selector: Option<&str>,
    include_hidden: bool,
) -> Result<ExtractedContent, CdpError> {
    let args = json!({
        "selector": selector,
        "includeHidden": include_hidden,
    });
    let value = session.evaluate_function(EXTRACT_SCRIPT, &args).await?;
    if value.is_null() {
        return Err(CdpError::ElementNotFound(
            selector.unwrap_or("body").to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Outer HTML, optionally scoped to a selector.
pub async fn page_html(session: &PageSession, selector: Option<&str>) -> Result<String, CdpError> {
    match selector {
        None => session.get_content().await,
        Some(selector) => {
            let probe = format!(
                "(() => {{ const el = document.querySelector({sel}); return el ? el.outerHTML : null; }})()",
                sel = serde_json::to_string(selector)?
            );
            let value = session.evaluate(&probe).await?;
            value
                .as_str()
                .map(String::from)
                .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))
        }
    }
}

/// Rendered text, optionally scoped to a selector.
pub async fn page_text(session: &PageSession, selector: Option<&str>) -> Result<String, CdpError> {
    let probe = match selector {
        None => "document.body ? document.body.innerText : ''".to_string(),
        Some(selector) => format!(
            "(() => {{ const el = document.querySelector({sel}); return el ? el.innerText : null; }})()",
            sel = serde_json::to_string(selector)?
        ),
    };
    let value = session.evaluate(&probe).await?;
    match (value.as_str(), selector) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(selector)) => Err(CdpError::ElementNotFound(selector.to_string())),
        (None, None) => Ok(String::new()),
    }
}

/// Render one extracted table as a pipe table.
pub fn render_table_markdown(table: &TableData) -> String {
    let mut markdown = String::new();
    markdown.push_str(&format!("| {} |\n", table.headers.join(" | ")));
    markdown.push_str(&format!(
        "| {} |\n",
        table
            .headers
            .iter()
            .map(|_| "---")
            .collect::<Vec<_>>()
            .join(" | ")
    ));
    for row in &table.rows {
        markdown.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    markdown
}

/// Compose a markdown summary of extracted content: title, structure
/// outline, content preview, and link/image/table inventories.
pub fn content_summary_markdown(content: &ExtractedContent) -> String {
    let mut summary = format!("# {}\n\n", content.title);

    if !content.headings.is_empty() {
        summary.push_str("## Page Structure\n\n");
        for heading in &content.headings {
            let indent = "  ".repeat(heading.level.saturating_sub(1) as usize);
            summary.push_str(&format!("{}- {}\n", indent, heading.text));
        }
        summary.push('\n');
    }

    if !content.paragraphs.is_empty() {
        summary.push_str("## Content Preview\n\n");
        for paragraph in content.paragraphs.iter().take(3) {
            summary.push_str(&format!("{}\n\n", paragraph));
        }
        if content.paragraphs.len() > 3 {
            summary.push_str(&format!(
                "_...and {} more paragraphs_\n\n",
                content.paragraphs.len() - 3
            ));
        }
    }

    if !content.links.is_empty() {
        summary.push_str(&format!("## Links ({} total)\n\n", content.links.len()));
        for link in content.links.iter().take(10) {
            let label = if link.text.is_empty() {
                &link.href
            } else {
                &link.text
            };
            summary.push_str(&format!("- [{}]({})\n", label, link.href));
        }
        if content.links.len() > 10 {
            summary.push_str(&format!(
                "- _...and {} more links_\n",
                content.links.len() - 10
            ));
        }
        summary.push('\n');
    }

    if !content.images.is_empty() {
        summary.push_str(&format!("## Images ({} total)\n\n", content.images.len()));
        for image in content.images.iter().take(5) {
            let alt = if image.alt.is_empty() {
                "No alt text"
            } else {
                &image.alt
            };
            summary.push_str(&format!("- {} ({})\n", alt, image.src));
        }
        if content.images.len() > 5 {
            summary.push_str(&format!(
                "- _...and {} more images_\n",
                content.images.len() - 5
            ));
        }
        summary.push('\n');
    }

    if !content.tables.is_empty() {
        summary.push_str(&format!("## Tables ({} total)\n\n", content.tables.len()));
        for table in &content.tables {
            summary.push_str(&render_table_markdown(table));
            summary.push('\n');
        }
    }

    summary
}

/// Compute the structure-analysis block for structured output.
pub fn structure_analysis(content: &ExtractedContent) -> StructureAnalysis {
    StructureAnalysis {
        heading_count: content.headings.len(),
        paragraph_count: content.paragraphs.len(),
        link_count: content.links.len(),
        image_count: content.images.len(),
        table_count: content.tables.len(),
        outline: content
            .headings
            .iter()
            .map(|h| format!("{} {}", "#".repeat(h.level as usize), h.text))
            .collect(),
    }
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
