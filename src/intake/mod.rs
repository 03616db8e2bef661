//! Turning picked files and clipboard pastes into image data URLs.

use std::path::Path;

use base64::alphabet;
use base64::engine::general_purpose::{self, GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIME_IMAGE_PNG: &str = "image/png";
pub const MIME_IMAGE_JPEG: &str = "image/jpeg";
pub const MIME_IMAGE_SVG: &str = "image/svg+xml";
const MIME_TEXT_PLAIN: &str = "text/plain";
const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = "base64";

/// Base64 the way browsers read data URLs: padding optional, stray trailing
/// bits tolerated.
const FORGIVING_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes a data URL's base64 payload, skipping embedded whitespace.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    FORGIVING_BASE64.decode(compact)
}

pub const SUPPORTED_IMAGE_TYPES: [&str; 3] = [MIME_IMAGE_PNG, MIME_IMAGE_JPEG, MIME_IMAGE_SVG];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("pasted item has no content")]
    EmptyPaste,
    #[error("pasted text is only supported when it is an SVG document")]
    NotSvgText,
    #[error("unsupported image type {mime}; only jpeg, png and svg are supported")]
    UnsupportedType { mime: String },
    #[error("could not determine image type for {path}")]
    UnknownExtension { path: String },
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

/// Borrowed view of a `data:` URL split into header and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub media_type: &'a str,
    pub is_base64: bool,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Splits `data:<media-type>[;param]*[;base64],<payload>`.
    pub fn parse(url: &'a str) -> IntakeResult<Self> {
        let rest = url
            .get(..DATA_URL_SCHEME.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(DATA_URL_SCHEME))
            .map(|_| &url[DATA_URL_SCHEME.len()..])
            .ok_or(IntakeError::NotDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(IntakeError::NotDataUrl)?;
        let mut segments = header.split(';');
        let media_type = segments.next().unwrap_or_default().trim();
        let is_base64 = segments.any(|segment| segment.trim().eq_ignore_ascii_case(BASE64_MARKER));
        Ok(Self {
            media_type,
            is_base64,
            payload,
        })
    }

    pub fn has_media_type(&self, mime: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(mime)
    }
}

pub fn is_supported_image_type(mime: &str) -> bool {
    SUPPORTED_IMAGE_TYPES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(mime))
}

/// Encodes raw bytes as a base64 data URL of the given media type.
pub fn data_url_from_bytes(mime: &str, bytes: &[u8]) -> String {
    format!(
        "{DATA_URL_SCHEME}{mime};{BASE64_MARKER},{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

pub fn mime_for_path(path: &Path) -> IntakeResult<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => Ok(MIME_IMAGE_PNG),
        Some("jpg" | "jpeg") => Ok(MIME_IMAGE_JPEG),
        Some("svg") => Ok(MIME_IMAGE_SVG),
        _ => Err(IntakeError::UnknownExtension {
            path: path.display().to_string(),
        }),
    }
}

/// First item of a clipboard paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PastedItem {
    Image { mime: String, bytes: Vec<u8> },
    Text { mime: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeSource {
    File { mime: String, bytes: Vec<u8> },
    Paste(PastedItem),
}

impl IntakeSource {
    pub fn into_data_url(self) -> IntakeResult<String> {
        match self {
            Self::File { mime, bytes } => image_data_url(&mime, &bytes),
            Self::Paste(PastedItem::Image { mime, bytes }) => image_data_url(&mime, &bytes),
            Self::Paste(PastedItem::Text { mime, text }) => {
                if !mime.eq_ignore_ascii_case(MIME_TEXT_PLAIN) {
                    return Err(IntakeError::UnsupportedType { mime });
                }
                svg_text_data_url(&text)
            }
        }
    }
}

fn image_data_url(mime: &str, bytes: &[u8]) -> IntakeResult<String> {
    if !is_supported_image_type(mime) {
        tracing::warn!(mime, "rejecting unsupported image type");
        return Err(IntakeError::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    Ok(data_url_from_bytes(&mime.to_ascii_lowercase(), bytes))
}

fn svg_text_data_url(text: &str) -> IntakeResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::EmptyPaste);
    }
    if !trimmed.starts_with("<svg") {
        return Err(IntakeError::NotSvgText);
    }
    Ok(data_url_from_bytes(MIME_IMAGE_SVG, text.as_bytes()))
}

/// Message sent from the picker surface to the page script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntakeMessage {
    #[serde(rename_all = "camelCase")]
    AddImage { image_data: String },
}

impl IntakeMessage {
    pub fn into_image_data(self) -> String {
        match self {
            Self::AddImage { image_data } => image_data,
        }
    }
}
