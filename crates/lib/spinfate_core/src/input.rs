//! Lenient request body handling and text caps for user-supplied fields.

use serde_json::Value;

/// Name used when a guest leaves the name blank.
pub const GUEST_NAME: &str = "Anonymous";

/// Maximum display name length, in characters.
pub const MAX_NAME_CHARS: usize = 30;

/// Maximum segment request length, in characters.
pub const MAX_REQUEST_CHARS: usize = 100;

/// Parse a request body as a JSON object; anything else is an empty object.
pub fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(v @ Value::Object(_)) => v,
        _ => Value::Object(Default::default()),
    }
}

/// Read `key` from a JSON object as text.
///
/// Strings are returned as-is, numbers and booleans in their JSON spelling.
/// Missing, `null`, arrays and objects yield `None`.
pub fn field_text(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Trim and keep at most `max` characters.
pub fn trim_to(text: &str, max: usize) -> String {
    text.trim().chars().take(max).collect()
}

/// Guest display name: trimmed, capped, [`GUEST_NAME`] when blank.
pub fn display_name(raw: Option<&str>) -> String {
    let name = trim_to(raw.unwrap_or_default(), MAX_NAME_CHARS);
    if name.is_empty() {
        GUEST_NAME.to_string()
    } else {
        name
    }
}

/// Segment request text: trimmed and capped; `None` when blank.
pub fn request_text(raw: Option<&str>) -> Option<String> {
    Some(trim_to(raw.unwrap_or_default(), MAX_REQUEST_CHARS)).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn malformed_body_is_empty_object() {
        assert_eq!(parse_body(b"{not json"), json!({}));
        assert_eq!(parse_body(b""), json!({}));
        assert_eq!(parse_body(b"[1,2]"), json!({}));
        assert_eq!(parse_body(b"\"str\""), json!({}));
        assert_eq!(parse_body(br#"{"a":1}"#), json!({"a": 1}));
    }

    #[test]
    fn field_text_coerces_scalars() {
        let body = json!({"s": "x", "n": 12, "b": true, "z": null, "o": {}, "a": []});
        assert_eq!(field_text(&body, "s").as_deref(), Some("x"));
        assert_eq!(field_text(&body, "n").as_deref(), Some("12"));
        assert_eq!(field_text(&body, "b").as_deref(), Some("true"));
        assert_eq!(field_text(&body, "z"), None);
        assert_eq!(field_text(&body, "o"), None);
        assert_eq!(field_text(&body, "a"), None);
        assert_eq!(field_text(&body, "missing"), None);
    }

    #[test]
    fn long_name_is_capped_at_thirty() {
        let long = "n".repeat(500);
        assert_eq!(display_name(Some(&long)).chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn long_request_is_capped_at_hundred() {
        let long = "r".repeat(500);
        let text = request_text(Some(&long)).unwrap();
        assert_eq!(text.chars().count(), MAX_REQUEST_CHARS);
    }

    #[test]
    fn caps_count_characters_not_bytes() {
        let emoji = "🎡".repeat(40);
        let name = display_name(Some(&emoji));
        assert_eq!(name.chars().count(), 30);
        assert_eq!(name, "🎡".repeat(30));
    }

    #[test]
    fn trimming_happens_before_the_cap() {
        let padded = format!("{}{}", " ".repeat(40), "abc");
        assert_eq!(display_name(Some(&padded)), "abc");
    }

    #[test]
    fn blank_values() {
        assert_eq!(display_name(Some("  \t ")), GUEST_NAME);
        assert_eq!(display_name(None), GUEST_NAME);
        assert_eq!(request_text(Some("   ")), None);
        assert_eq!(request_text(None), None);
    }
}
