//! Route handlers.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{Html, IntoResponse, Response},
};
use bytes::Bytes;

use crate::config::PageMode;
use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::optimizer::OptimizationResult;
use crate::render::{render_index, render_result, Explanation, Outcome, RenderContext};
use crate::upload::{PartStream, UploadPart};

/// `GET /`: the upload form.
pub async fn index() -> Result<Html<String>, AppError> {
    Ok(Html(render_index()?))
}

/// `POST /optimize`: decode, optimize, render.
pub async fn optimize(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let parts = PartStream::new(multipart?);
    match state.config.page.mode {
        PageMode::Compare => compare(state, parts).await,
        PageMode::Debug => list_parts(parts).await,
    }
}

/// The uploaded picture: its declared content type and bytes.
struct Picture {
    content_type: String,
    bytes: Bytes,
}

async fn compare(state: AppState, mut parts: PartStream) -> Result<Response, AppError> {
    let mut picture: Option<Picture> = None;

    while let Some(part) = parts.next_part().await? {
        match part {
            UploadPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                if picture.is_some() {
                    tracing::warn!(
                        field = %name,
                        file_name = %file_name,
                        "Ignoring additional file part"
                    );
                    continue;
                }
                tracing::debug!(
                    field = %name,
                    file_name = %file_name,
                    content_type = %content_type,
                    size = bytes.len(),
                    "Received picture"
                );
                picture = Some(Picture {
                    content_type,
                    bytes,
                });
            }
            other => tracing::debug!(part = %other.summary(), "Ignoring non-file part"),
        }
    }

    let Picture {
        content_type,
        bytes,
    } = picture.ok_or(AppError::MissingPicture)?;

    let result = run_optimizer(&state, bytes.clone()).await?;
    let explanation = Explanation::new(&content_type, &bytes, &result);
    log_outcome(&content_type, bytes.len(), &result, explanation.outcome);

    let ctx = RenderContext::with_explanation(content_type, bytes, result, explanation);
    let html = render_result(&ctx, &state.config.page)?;
    Ok(Html(html).into_response())
}

/// Runs the optimizer on the blocking pool. There is no timeout.
async fn run_optimizer(state: &AppState, source: Bytes) -> Result<OptimizationResult, AppError> {
    let optimizer = state.optimizer.clone();
    let options = state.config.optimizer.options();
    let result = tokio::task::spawn_blocking(move || optimizer.optimize(&source, &options)).await?;
    Ok(result)
}

fn log_outcome(content_type: &str, source_len: usize, result: &OptimizationResult, outcome: Outcome) {
    match &result.internal_error {
        Some(error) => {
            tracing::warn!(
                content_type = %content_type,
                error = %error,
                "The optimization failed"
            );
        }
        None => {
            tracing::info!(
                content_type = %content_type,
                source_size = source_len,
                optimized_size = result.picture.len(),
                saved_ratio = result.saved_ratio,
                quality = result.jpeg_quality_used,
                elapsed_ms = result.elapsed.as_millis() as u64,
                outcome = outcome.as_str(),
                "The optimization succeeded"
            );
        }
    }
    metrics::record_optimization(outcome.as_str(), result);
}

/// Debug mode: one line per part received.
async fn list_parts(mut parts: PartStream) -> Result<Response, AppError> {
    let mut lines = Vec::new();
    while let Some(part) = parts.next_part().await? {
        lines.push(part.summary());
    }
    Ok(lines.join("\n").into_response())
}
