//! Header-only image format sniffing.
//!
//! Classifies a byte buffer as GIF, PNG, JPEG or BMP from its magic header
//! and extracts pixel dimensions without decoding any pixel data. The byte
//! offsets and endianness here are a de facto wire format shared with
//! previously classified images and must stay bit-exact.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Dimensions;

/// PNG signature, first 8 bytes of every PNG file.
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// DIB header size of a Windows V3 `BITMAPINFOHEADER`; the only BMP
/// flavor recognized.
const BMP_V3_HEADER_SIZE: u16 = 40;

/// Sniffing verdict.
///
/// `content_type` is empty and both dimensions are `-1` when no format
/// matched. A recognized format may still carry `-1` dimensions (e.g. a
/// truncated JPEG header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub content_type: String,
    pub width: i64,
    pub height: i64,
}

impl ImageInfo {
    fn new(content_type: &str, width: i64, height: i64) -> Self {
        Self {
            content_type: content_type.to_string(),
            width,
            height,
        }
    }

    /// The "no match" verdict: empty type, unknown dimensions.
    pub fn unknown() -> Self {
        Self::new("", -1, -1)
    }

    pub fn is_recognized(&self) -> bool {
        !self.content_type.is_empty()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

type Detector = fn(&[u8]) -> Option<ImageInfo>;

/// Ordered dispatch table; first match wins.
const DETECTORS: &[Detector] = &[sniff_gif, sniff_png, sniff_jpeg, sniff_bmp];

/// Classify `data` by magic header.
///
/// Total function: any input, including truncated or garbage buffers,
/// produces a verdict and never panics.
pub fn sniff(data: &[u8]) -> ImageInfo {
    DETECTORS
        .iter()
        .find_map(|detect| detect(data))
        .unwrap_or_else(ImageInfo::unknown)
}

fn sniff_gif(data: &[u8]) -> Option<ImageInfo> {
    if data.len() < 10 || !(data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a")) {
        return None;
    }
    let width = u16::from_le_bytes([data[6], data[7]]);
    let height = u16::from_le_bytes([data[8], data[9]]);
    Some(ImageInfo::new("image/gif", width as i64, height as i64))
}

fn sniff_png(data: &[u8]) -> Option<ImageInfo> {
    // Per the PNG spec the IHDR chunk is mandatory and comes first: the
    // signature at 0, a 4-byte chunk length, the tag at 12, then the 4-byte
    // width and height. Signature-only buffers without IHDR (a pre-spec
    // legacy form) are deliberately not recognized.
    if data.len() < 24 || !data.starts_with(PNG_SIGNATURE) || &data[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some(ImageInfo::new("image/png", width as i64, height as i64))
}

fn sniff_jpeg(data: &[u8]) -> Option<ImageInfo> {
    if data.len() < 2 || !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    // A malformed or truncated marker stream is not a sniffer failure: the
    // buffer is still a JPEG, just one with unknown dimensions.
    let (width, height) = scan_jpeg_markers(data).unwrap_or((-1, -1));
    Some(ImageInfo::new("image/jpeg", width, height))
}

/// Walk the JPEG marker segments looking for a Start-Of-Frame.
///
/// SOF0..SOF3 (`0xC0..=0xC3`) carry big-endian height then width — note the
/// reversed field order relative to the other formats. Reaching Start-Of-Scan
/// (`0xDA`) or running off the buffer yields `None`.
fn scan_jpeg_markers(data: &[u8]) -> Option<(i64, i64)> {
    let mut pos = 2usize;
    let mut b = *data.get(pos)?;
    pos += 1;
    while b != 0xDA {
        // Skip entropy fill until the next 0xFF prefix, then collapse any
        // run of 0xFF padding down to the marker byte itself.
        while b != 0xFF {
            b = *data.get(pos)?;
            pos += 1;
        }
        while b == 0xFF {
            b = *data.get(pos)?;
            pos += 1;
        }
        if (0xC0..=0xC3).contains(&b) {
            // Skip segment length (2) and sample precision (1).
            pos = pos.checked_add(3)?;
            let height = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]);
            let width = u16::from_be_bytes([*data.get(pos + 2)?, *data.get(pos + 3)?]);
            return Some((width as i64, height as i64));
        }
        // Any other segment: length field includes its own two bytes.
        let seg_len = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;
        pos = pos.checked_add(2)?.checked_add(seg_len.checked_sub(2)?)?;
        b = *data.get(pos)?;
        pos += 1;
    }
    None
}

fn sniff_bmp(data: &[u8]) -> Option<ImageInfo> {
    if data.len() < 30 || !data.starts_with(b"BM") {
        return None;
    }
    let dib_size = u16::from_le_bytes([data[14], data[15]]);
    if dib_size != BMP_V3_HEADER_SIZE {
        return None;
    }
    let width = u32::from_le_bytes([data[18], data[19], data[20], data[21]]);
    let height = u32::from_le_bytes([data[22], data[23], data[24], data[25]]);
    Some(ImageInfo::new("image/x-ms-bmp", width as i64, height as i64))
}
