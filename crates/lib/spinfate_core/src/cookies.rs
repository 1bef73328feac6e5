//! `Cookie` request header parsing.
//!
//! Pairs are separated by `;`, names and values are trimmed of surrounding
//! whitespace, and a value wrapped in double quotes is unwrapped (RFC 6265
//! `cookie-value`). When a name repeats, the first occurrence wins, which is
//! what browsers send for the most specific path.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Parse a `Cookie` header value into a name → raw value map.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }
    cookies
}

/// Find cookie `name` in a `Cookie` header and percent-decode its value.
///
/// `None` if the cookie is absent or does not decode to UTF-8.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    let raw = parse_cookie_header(header).remove(name)?;
    percent_decode_str(&raw)
        .decode_utf8()
        .ok()
        .map(|v| v.into_owned())
}

/// Percent-encode a value for a `Set-Cookie` header.
pub fn encode_cookie_value(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
