//! JPEG metadata segment handling.
//!
//! Re-encoding through `image` drops everything but the pixels. To keep
//! EXIF/XMP/ICC and comments, the APP1..APP15 and COM segments of the source
//! are copied into the freshly encoded file, right after its SOI/APP0 header.
//! APP14 (Adobe) is left out: its transform flag describes the source's colour
//! encoding, not the YCbCr output.

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const APP14: u8 = 0xEE;
const APP15: u8 = 0xEF;
const COM: u8 = 0xFE;
const SOS: u8 = 0xDA;

/// A marker segment: its full byte span including the `FF xx` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    marker: u8,
    start: usize,
    end: usize,
}

/// Whether `data` starts with a JPEG SOI marker.
pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&SOI)
}

/// Walk the header segments (everything before SOS).
fn header_segments(data: &[u8]) -> Vec<Segment> {
    let mut segments = Vec::new();
    if !is_jpeg(data) {
        return segments;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            break;
        }
        let marker = data[pos + 1];
        // fill bytes
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == SOS {
            break;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if len < 2 || pos + 2 + len > data.len() {
            break;
        }
        segments.push(Segment {
            marker,
            start: pos,
            end: pos + 2 + len,
        });
        pos += 2 + len;
    }
    segments
}

/// Metadata segments of a JPEG (APP1..APP15 except APP14, COM), in file order.
pub fn metadata_segments(data: &[u8]) -> Vec<&[u8]> {
    header_segments(data)
        .into_iter()
        .filter(|s| ((APP1..=APP15).contains(&s.marker) && s.marker != APP14) || s.marker == COM)
        .map(|s| &data[s.start..s.end])
        .collect()
}

/// Copy the metadata segments of `source` into `encoded`.
///
/// Returns `encoded` unchanged when either side is not a JPEG or the source
/// carries no metadata.
pub fn transplant(source: &[u8], encoded: Vec<u8>) -> Vec<u8> {
    let metadata = metadata_segments(source);
    if metadata.is_empty() || !is_jpeg(&encoded) {
        return encoded;
    }

    // Insert after SOI and a leading APP0 (JFIF) if present.
    let insert_at = header_segments(&encoded)
        .first()
        .filter(|s| s.marker == APP0)
        .map(|s| s.end)
        .unwrap_or(2);

    let extra: usize = metadata.iter().map(|s| s.len()).sum();
    let mut out = Vec::with_capacity(encoded.len() + extra);
    out.extend_from_slice(&encoded[..insert_at]);
    for segment in metadata {
        out.extend_from_slice(segment);
    }
    out.extend_from_slice(&encoded[insert_at..]);
    out
}
