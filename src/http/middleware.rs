//! Request middleware.
//!
//! Deflate and gzip are applied by two separate compression layers, so the
//! inner deflate layer would win whenever the client lists deflate at all.
//! [`rank_encodings`] runs between them and hides deflate from the inner
//! layer when the client ranks gzip higher.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Quality the client assigned to `coding`, or `None` when it is not listed.
fn quality_of(accept: &str, coding: &str) -> Option<f32> {
    accept.split(',').find_map(|entry| {
        let mut params = entry.split(';');
        let name = params.next()?.trim();
        if !name.eq_ignore_ascii_case(coding) {
            return None;
        }
        let q = params
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                if key.trim().eq_ignore_ascii_case("q") {
                    value.trim().parse::<f32>().ok()
                } else {
                    None
                }
            })
            .next()
            .unwrap_or(1.0);
        Some(q)
    })
}

/// Whether both codings are listed and gzip has the strictly higher quality.
pub fn gzip_outranks_deflate(accept: &str) -> bool {
    match (quality_of(accept, "gzip"), quality_of(accept, "deflate")) {
        (Some(gzip), Some(deflate)) => gzip > deflate,
        _ => false,
    }
}

fn without_deflate(accept: &str) -> String {
    accept
        .split(',')
        .map(str::trim)
        .filter(|entry| {
            let name = entry.split(';').next().unwrap_or_default().trim();
            !entry.is_empty() && !name.eq_ignore_ascii_case("deflate")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drop deflate from `Accept-Encoding` when the client prefers gzip.
pub async fn rank_encodings(mut req: Request<Body>, next: Next) -> Response {
    let accept = req
        .headers()
        .get_all(header::ACCEPT_ENCODING)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");

    if gzip_outranks_deflate(&accept) {
        if let Ok(value) = HeaderValue::from_str(&without_deflate(&accept)) {
            tracing::trace!(accept = %accept, "Client prefers gzip over deflate");
            req.headers_mut().insert(header::ACCEPT_ENCODING, value);
        }
    }

    next.run(req).await
}
