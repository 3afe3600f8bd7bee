//! Page content extraction and analysis.
//!
//! The live DOM is the parser: structure is pulled out with one evaluate
//! call per concern, and any markdown rendering happens Rust-side over the
//! extracted structure.

mod extract;
mod forms;
mod page_info;

pub use extract::{
    ContentFormat, ExtractedContent, Heading, ImageInfo, LinkInfo, StructureAnalysis, TableData,
    content_summary_markdown, extract_structured, page_html, page_text, render_table_markdown,
    structure_analysis,
};
pub use forms::{FormInfo, FormInputInfo, SelectOption, ValidationInfo, analyze_forms};
pub use page_info::{
    AccessibilityReport, Dimensions, PageDimensions, PageMetadata, PagePerformance, ResourceCount,
    SeoReport, accessibility_report, extract_page_metadata, page_dimensions, page_performance,
    seo_report,
};
