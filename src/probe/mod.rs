//! Natural image dimensions read from a data URL without decoding pixels.

mod worker;

use std::borrow::Cow;
use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use percent_encoding::percent_decode_str;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;
use thiserror::Error;

use crate::intake::{decode_base64_payload, DataUrl, MIME_IMAGE_SVG};

pub use worker::{spawn_probe, spawn_probe_with, PendingProbe, ProbeStatus};

/// Size a browser reports for an SVG that declares neither size nor viewBox.
const SVG_FALLBACK_WIDTH: f64 = 300.0;
const SVG_FALLBACK_HEIGHT: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(self) -> Option<f64> {
        (self.width > 0 && self.height > 0)
            .then(|| f64::from(self.width) / f64::from(self.height))
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("image source is not a data URL")]
    NotDataUrl,
    #[error("cannot probe dimensions of {mime}")]
    UnsupportedType { mime: String },
    #[error("image payload is not valid base64")]
    InvalidPayload,
    #[error("failed to read image header: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to parse svg: {0}")]
    Svg(#[from] quick_xml::Error),
    #[error("svg document has no <svg> root element")]
    MissingSvgRoot,
    #[error("image reports zero width or height")]
    ZeroDimensions,
    #[error("dimension probe worker stopped before reporting")]
    WorkerDisconnected,
}

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

pub fn probe_dimensions(data_url: &str) -> ProbeResult<NaturalSize> {
    let parsed = DataUrl::parse(data_url).map_err(|_| ProbeError::NotDataUrl)?;
    let bytes = payload_bytes(&parsed)?;
    let size = if parsed.has_media_type(MIME_IMAGE_SVG) {
        svg_dimensions(&String::from_utf8_lossy(&bytes))?
    } else {
        raster_dimensions(parsed.media_type, bytes)?
    };
    if size.width == 0 || size.height == 0 {
        return Err(ProbeError::ZeroDimensions);
    }
    Ok(size)
}

fn payload_bytes(parsed: &DataUrl<'_>) -> ProbeResult<Vec<u8>> {
    if parsed.is_base64 {
        decode_base64_payload(parsed.payload).map_err(|_| ProbeError::InvalidPayload)
    } else {
        Ok(percent_decode_str(parsed.payload).collect())
    }
}

fn raster_dimensions(mime: &str, bytes: Vec<u8>) -> ProbeResult<NaturalSize> {
    let format = ImageFormat::from_mime_type(mime).ok_or_else(|| ProbeError::UnsupportedType {
        mime: mime.to_string(),
    })?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;
    Ok(NaturalSize::new(width, height))
}

/// Reads the root element's `width`/`height`, falling back to `viewBox`.
pub fn svg_dimensions(text: &str) -> ProbeResult<NaturalSize> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(root) | Event::Empty(root) => {
                if root.local_name().as_ref() != b"svg" {
                    return Err(ProbeError::MissingSvgRoot);
                }
                return Ok(root_svg_size(&root));
            }
            Event::Eof => return Err(ProbeError::MissingSvgRoot),
            _ => {}
        }
    }
}

fn root_svg_size(root: &BytesStart<'_>) -> NaturalSize {
    let mut width = None;
    let mut height = None;
    let mut view_box = None;
    for attribute in root.attributes().flatten() {
        let value: Cow<'_, str> = String::from_utf8_lossy(&attribute.value);
        match attribute.key.local_name().as_ref() {
            b"width" => width = parse_length(&value),
            b"height" => height = parse_length(&value),
            b"viewBox" => view_box = parse_view_box(&value),
            _ => {}
        }
    }

    let (width, height) = match (width, height, view_box) {
        (Some(width), Some(height), _) => (width, height),
        (Some(width), None, Some((vb_width, vb_height))) => (width, width * vb_height / vb_width),
        (None, Some(height), Some((vb_width, vb_height))) => {
            (height * vb_width / vb_height, height)
        }
        (None, None, Some(view_box)) => view_box,
        (width, height, _) => (
            width.unwrap_or(SVG_FALLBACK_WIDTH),
            height.unwrap_or(SVG_FALLBACK_HEIGHT),
        ),
    };
    NaturalSize::new(to_pixels(width), to_pixels(height))
}

/// Absolute lengths only: a bare number or a `px` suffix.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|length| length.is_finite() && *length > 0.0)
}

fn parse_view_box(value: &str) -> Option<(f64, f64)> {
    let numbers = value
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match numbers.as_slice() {
        [_, _, width, height] if *width > 0.0 && *height > 0.0 => Some((*width, *height)),
        _ => None,
    }
}

fn to_pixels(length: f64) -> u32 {
    let rounded = length.round();
    if rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}
