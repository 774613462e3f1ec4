//! HTML pages.

use askama::Template;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::config::PageConfig;
use crate::optimizer::OptimizationResult;
use crate::render::explanation::Explanation;
use crate::render::format::{format_percentage, kilobytes};
use crate::upload::FALLBACK_CONTENT_TYPE;

/// The optimized picture is always labeled as JPEG.
pub const OPTIMIZED_CONTENT_TYPE: &str = "image/jpeg";

/// Everything the result page needs from one request.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub source_content_type: String,
    pub source: Bytes,
    pub optimized: Vec<u8>,
    pub saved_ratio: f64,
    pub explanation: Explanation,
}

impl RenderContext {
    pub fn new(source_content_type: String, source: Bytes, result: OptimizationResult) -> Self {
        let explanation = Explanation::new(&source_content_type, &source, &result);
        Self::with_explanation(source_content_type, source, result, explanation)
    }

    /// Build from an explanation the caller already derived from `result`.
    pub fn with_explanation(
        source_content_type: String,
        source: Bytes,
        result: OptimizationResult,
        explanation: Explanation,
    ) -> Self {
        Self {
            source_content_type,
            source,
            optimized: result.picture,
            saved_ratio: result.saved_ratio,
            explanation,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage;

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage<'a> {
    pub explanation: &'a str,
    pub issue_url: Option<&'a str>,
    pub source_uri: String,
    pub source_label: String,
    pub optimized_uri: String,
    pub optimized_label: String,
    pub juxtapose_js: &'a str,
    pub juxtapose_css: &'a str,
}

impl<'a> ResultPage<'a> {
    pub fn new(ctx: &'a RenderContext, page: &'a PageConfig) -> Self {
        Self {
            explanation: &ctx.explanation.text,
            issue_url: ctx
                .explanation
                .wants_issue_link()
                .then_some(page.issue_url.as_str()),
            source_uri: data_uri(&ctx.source_content_type, &ctx.source),
            source_label: format!("Original size: {} KB", kilobytes(ctx.source.len())),
            optimized_uri: data_uri(OPTIMIZED_CONTENT_TYPE, &ctx.optimized),
            optimized_label: format!(
                "Optimized size: {} KB ({})",
                kilobytes(ctx.optimized.len()),
                format_percentage(1.0 - ctx.saved_ratio)
            ),
            juxtapose_js: &page.juxtapose_js,
            juxtapose_css: &page.juxtapose_css,
        }
    }
}

/// Render the upload form.
pub fn render_index() -> Result<String, askama::Error> {
    IndexPage.render()
}

/// Render the before/after page.
pub fn render_result(ctx: &RenderContext, page: &PageConfig) -> Result<String, askama::Error> {
    ResultPage::new(ctx, page).render()
}

/// `data:<mime>;base64,<payload>`. The payload is plain base64 and the mime
/// type is reduced to token characters, so the result is attribute-safe.
pub fn data_uri(content_type: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        sanitize_content_type(content_type),
        STANDARD.encode(data)
    )
}

fn sanitize_content_type(content_type: &str) -> &str {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let valid = !essence.is_empty()
        && essence.contains('/')
        && essence
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&^_.+-/".contains(c));
    if valid {
        essence
    } else {
        FALLBACK_CONTENT_TYPE
    }
}
