//! Rewrites SVG data URLs so the image stretches to fill its box.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use percent_encoding::percent_decode_str;
use regex::Regex;
use thiserror::Error;

use crate::intake::{decode_base64_payload, DataUrl, MIME_IMAGE_SVG};

const STRETCH_ATTRIBUTE: &str = r#"preserveAspectRatio="none""#;
const SVG_OPEN_TAG: &str = "<svg";

static PRESERVE_ASPECT_RATIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"preserveAspectRatio\s*=\s*["'][^"']*["']"#).expect("static regex is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SvgRewriteError {
    #[error("not an svg data URL")]
    NotSvg,
    #[error("svg payload is not valid base64")]
    InvalidBase64,
    #[error("svg payload has a malformed percent escape")]
    InvalidPercentEncoding,
    #[error("svg text contains {0:?}, which has no single-byte encoding")]
    UnrepresentableCharacter(char),
}

/// Forces `preserveAspectRatio="none"` on an SVG data URL.
///
/// Anything that is not an SVG data URL comes back unchanged, as does an SVG
/// whose payload cannot be decoded or re-encoded. Output is always base64.
pub fn normalize_svg_data_url(data_url: Option<&str>) -> Option<String> {
    let data_url = data_url?;
    match rewrite_svg_data_url(data_url) {
        Ok(rewritten) => Some(rewritten),
        Err(SvgRewriteError::NotSvg) => Some(data_url.to_string()),
        Err(err) => {
            tracing::warn!(%err, "leaving svg data URL unchanged");
            Some(data_url.to_string())
        }
    }
}

pub fn rewrite_svg_data_url(data_url: &str) -> Result<String, SvgRewriteError> {
    let parsed = DataUrl::parse(data_url).map_err(|_| SvgRewriteError::NotSvg)?;
    if !parsed.has_media_type(MIME_IMAGE_SVG) {
        return Err(SvgRewriteError::NotSvg);
    }

    let text = if parsed.is_base64 {
        decode_base64_text(parsed.payload)?
    } else {
        decode_percent_text(parsed.payload)?
    };
    let stretched = stretch_svg_text(&text);
    let bytes = latin1_bytes(&stretched)?;
    Ok(format!(
        "data:{MIME_IMAGE_SVG};base64,{}",
        STANDARD.encode(bytes)
    ))
}

/// Replaces an existing `preserveAspectRatio` value with `none`, or adds the
/// attribute to the first `<svg` tag.
pub fn stretch_svg_text(text: &str) -> String {
    if PRESERVE_ASPECT_RATIO.is_match(text) {
        return PRESERVE_ASPECT_RATIO
            .replace(text, STRETCH_ATTRIBUTE)
            .into_owned();
    }
    text.replacen(SVG_OPEN_TAG, &format!("{SVG_OPEN_TAG} {STRETCH_ATTRIBUTE}"), 1)
}

fn decode_base64_text(payload: &str) -> Result<String, SvgRewriteError> {
    let bytes = decode_base64_payload(payload).map_err(|_| SvgRewriteError::InvalidBase64)?;
    Ok(bytes.into_iter().map(char::from).collect())
}

fn decode_percent_text(payload: &str) -> Result<String, SvgRewriteError> {
    if !has_well_formed_escapes(payload) {
        return Err(SvgRewriteError::InvalidPercentEncoding);
    }
    percent_decode_str(payload)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|_| SvgRewriteError::InvalidPercentEncoding)
}

fn has_well_formed_escapes(payload: &str) -> bool {
    let bytes = payload.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let escape = bytes.get(index + 1..index + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            index += 3;
        } else {
            index += 1;
        }
    }
    true
}

fn latin1_bytes(text: &str) -> Result<Vec<u8>, SvgRewriteError> {
    text.chars()
        .map(|c| u8::try_from(c).map_err(|_| SvgRewriteError::UnrepresentableCharacter(c)))
        .collect()
}
