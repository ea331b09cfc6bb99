//! Share Links
//!
//! A link carries the whole parameter record as base64-encoded JSON in a
//! single `data` query parameter:
//!
//! `https://host/path?data=eyJmY3IiOjEuNiwiZmluZ2VybGluZ3MiOjM1MDAwLC4uLn0%3D`
//!
//! Keys are camelCase. Links produced by older front-ends put the raw base64
//! in the query, so `+` may arrive as a space and `/`/`=` may or may not be
//! percent-escaped; decoding accepts all of those forms.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use eyre::{eyre, Result, WrapErr};

use crate::model::{CycleInputs, CycleParameters};

/// Query parameter holding the payload
pub const DATA_PARAM: &str = "data";

/// Serialize parameters into the link payload (unescaped base64)
pub fn encode_payload(params: &CycleParameters) -> Result<String> {
    let json = serde_json::to_string(params)?;
    Ok(STANDARD.encode(json))
}

/// Decode a payload back into (possibly partial) parameters
pub fn decode_payload(payload: &str) -> Result<CycleInputs> {
    let base64 = unescape_payload(payload);
    let bytes = STANDARD
        .decode(base64.as_bytes())
        .wrap_err("Share payload is not valid base64")?;
    let inputs: CycleInputs =
        serde_json::from_slice(&bytes).wrap_err("Share payload is not a parameter object")?;
    Ok(inputs)
}

/// Build the full share URL for `params`
pub fn build_share_url(base_url: &str, params: &CycleParameters) -> Result<String> {
    let payload = encode_payload(params)?;
    let separator = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{}{}{}={}",
        base_url,
        separator,
        DATA_PARAM,
        escape_payload(&payload)
    ))
}

/// Find the payload in a link.
///
/// Accepts a full URL, a bare `data=...` query, or the bare payload itself.
pub fn extract_payload(link: &str) -> Option<&str> {
    // Trailing spaces may be a form-decoded '+', so only line endings go
    let link = link.trim_start().trim_end_matches(['\r', '\n']);
    let link = link.split_once('#').map_or(link, |(before, _)| before);

    let query = match link.split_once('?') {
        Some((_, query)) => query,
        None if link.contains('=') && link.starts_with(DATA_PARAM) => link,
        None => return Some(link).filter(|s| !s.is_empty()),
    };

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == DATA_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Decode the parameters carried by a link
pub fn parse_link(link: &str) -> Result<CycleInputs> {
    let payload =
        extract_payload(link).ok_or_else(|| eyre!("Link has no '{}' parameter", DATA_PARAM))?;
    decode_payload(payload)
}

fn escape_payload(payload: &str) -> String {
    let mut escaped = String::with_capacity(payload.len() + 8);
    for c in payload.chars() {
        match c {
            '+' => escaped.push_str("%2B"),
            '/' => escaped.push_str("%2F"),
            '=' => escaped.push_str("%3D"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_payload(payload: &str) -> String {
    let mut out = String::with_capacity(payload.len());
    let mut rest = payload;

    while let Some(c) = rest.chars().next() {
        if c == '%' {
            let decoded = match rest.get(1..3) {
                Some("2B" | "2b") => Some('+'),
                Some("2F" | "2f") => Some('/'),
                Some("3D" | "3d") => Some('='),
                _ => None,
            };
            if let Some(d) = decoded {
                out.push(d);
                rest = &rest[3..];
                continue;
            }
        }

        // Form decoding turns a raw '+' into a space
        out.push(if c == ' ' { '+' } else { c });
        rest = &rest[c.len_utf8()..];
    }

    out
}

// ============================================
// TESTS
// ============================================
