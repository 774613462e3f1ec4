//! Lazy multipart decoding into [`UploadPart`]s.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;

/// Content type assumed for file parts that do not declare one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Error raised while reading a multipart body.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read multipart body: {0}")]
pub struct UploadError(#[from] MultipartError);

impl UploadError {
    /// Status suggested by the underlying parser (413 for oversized bodies).
    pub fn status(&self) -> StatusCode {
        self.0.status()
    }
}

/// One decoded part of an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadPart {
    /// A plain form field.
    Form { name: String, value: String },
    /// A file attachment.
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
    /// A non-text part that is not a file.
    Binary {
        name: String,
        content_type: String,
        bytes: Bytes,
    },
}

impl UploadPart {
    pub fn name(&self) -> &str {
        match self {
            UploadPart::Form { name, .. }
            | UploadPart::File { name, .. }
            | UploadPart::Binary { name, .. } => name,
        }
    }

    /// One-line description used by the debug listing.
    pub fn summary(&self) -> String {
        match self {
            UploadPart::Form { name, value } => format!("FormItem({},{})", name, value),
            UploadPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => format!(
                "FileItem({},{},{},{} bytes)",
                name,
                file_name,
                content_type,
                bytes.len()
            ),
            UploadPart::Binary {
                name,
                content_type,
                bytes,
            } => format!("BinaryItem({},{},{} bytes)", name, content_type, bytes.len()),
        }
    }
}

/// Forward-only reader over the parts of a multipart body.
///
/// Each call to [`PartStream::next_part`] reads one part to the end before
/// returning it; the underlying field is dropped before the call returns,
/// whether reading succeeded or not.
pub struct PartStream {
    multipart: Multipart,
    read: usize,
}

impl PartStream {
    pub fn new(multipart: Multipart) -> Self {
        Self { multipart, read: 0 }
    }

    /// Number of parts produced so far.
    pub fn parts_read(&self) -> usize {
        self.read
    }

    /// Read the next part in wire order, or `None` at the end of the body.
    pub async fn next_part(&mut self) -> Result<Option<UploadPart>, UploadError> {
        let Some(field) = self.multipart.next_field().await? else {
            return Ok(None);
        };
        let part = read_field(field).await?;
        self.read += 1;

        tracing::trace!(index = self.read, name = %part.name(), "Decoded multipart part");
        Ok(Some(part))
    }
}

async fn read_field(field: Field<'_>) -> Result<UploadPart, UploadError> {
    let name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await?;

    let part = match (file_name, content_type) {
        (Some(file_name), content_type) => UploadPart::File {
            name,
            file_name,
            content_type: content_type.unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
            bytes,
        },
        (None, Some(content_type)) if !is_text(&content_type) => UploadPart::Binary {
            name,
            content_type,
            bytes,
        },
        (None, _) => UploadPart::Form {
            name,
            value: String::from_utf8_lossy(&bytes).into_owned(),
        },
    };
    Ok(part)
}

fn is_text(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request};

    const BOUNDARY: &str = "X-BOUNDARY";

    fn body(parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, file_name, content_type, data) in parts {
            out.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", name);
            if let Some(file_name) = file_name {
                disposition.push_str(&format!("; filename=\"{}\"", file_name));
            }
            out.extend_from_slice(disposition.as_bytes());
            out.extend_from_slice(b"\r\n");
            if let Some(content_type) = content_type {
                out.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        out
    }

    async fn stream(raw: Vec<u8>) -> PartStream {
        let request = Request::builder()
            .method("POST")
            .uri("/optimize")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(raw))
            .unwrap();
        PartStream::new(Multipart::from_request(request, &()).await.unwrap())
    }

    #[tokio::test]
    async fn test_parts_in_wire_order() {
        let picture: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let raw = body(&[
            ("title", None, None, &b"holiday"[..]),
            ("picture", Some("cat.png"), Some("image/png"), &picture[..]),
            ("blob", None, Some("application/octet-stream"), &[0u8, 1, 2, 3][..]),
            ("note", None, Some("text/plain"), &b"fin"[..]),
        ]);

        let mut parts = stream(raw).await;
        let mut seen = Vec::new();
        while let Some(part) = parts.next_part().await.unwrap() {
            seen.push(part);
        }

        assert_eq!(parts.parts_read(), 4);
        assert_eq!(
            seen[0],
            UploadPart::Form {
                name: "title".into(),
                value: "holiday".into()
            }
        );
        match &seen[1] {
            UploadPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                assert_eq!(name, "picture");
                assert_eq!(file_name, "cat.png");
                assert_eq!(content_type, "image/png");
                assert_eq!(&bytes[..], picture.as_slice());
            }
            other => panic!("expected a file part, got {:?}", other),
        }
        assert!(matches!(&seen[2], UploadPart::Binary { bytes, .. } if bytes[..] == [0u8, 1, 2, 3]));
        assert!(matches!(&seen[3], UploadPart::Form { value, .. } if value == "fin"));
    }

    #[tokio::test]
    async fn test_file_without_content_type_gets_fallback() {
        let raw = body(&[("picture", Some("raw.bin"), None, &b"abc"[..])]);
        let mut parts = stream(raw).await;
        let part = parts.next_part().await.unwrap().unwrap();
        assert!(matches!(
            part,
            UploadPart::File { ref content_type, .. } if content_type == FALLBACK_CONTENT_TYPE
        ));
        assert!(parts.next_part().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_truncated_body_is_an_error() {
        let mut raw = body(&[("picture", Some("a.jpg"), Some("image/jpeg"), &b"abcdef"[..])]);
        raw.truncate(raw.len() - 20);
        let mut parts = stream(raw).await;
        assert!(parts.next_part().await.is_err());
    }

    #[test]
    fn test_summaries() {
        let form = UploadPart::Form {
            name: "a".into(),
            value: "b".into(),
        };
        assert_eq!(form.summary(), "FormItem(a,b)");

        let file = UploadPart::File {
            name: "picture".into(),
            file_name: "cat.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: Bytes::from_static(&[1, 2, 3]),
        };
        assert_eq!(file.summary(), "FileItem(picture,cat.jpg,image/jpeg,3 bytes)");

        let binary = UploadPart::Binary {
            name: "blob".into(),
            content_type: "application/zip".into(),
            bytes: Bytes::new(),
        };
        assert_eq!(binary.summary(), "BinaryItem(blob,application/zip,0 bytes)");
    }

    #[test]
    fn test_is_text() {
        assert!(is_text("text/plain; charset=utf-8"));
        assert!(is_text("TEXT/html"));
        assert!(!is_text("image/png"));
        assert!(!is_text("txt"));
    }
}
