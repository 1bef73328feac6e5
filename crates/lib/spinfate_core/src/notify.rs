//! Webhook notification payloads (Discord embed format).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::segments::Segment;

/// Embed colour for segment request notifications.
pub const REQUEST_COLOR: u32 = 0xffe600;

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    pub fields: Vec<EmbedField>,
    pub footer: Footer,
    /// RFC 3339.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub text: String,
}

fn field(name: &str, value: &str, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value: format!("**{value}**"),
        inline,
    }
}

fn single(embed: Embed) -> WebhookPayload {
    WebhookPayload {
        embeds: vec![embed],
    }
}

/// Notification for an accepted spin.
pub fn spin_payload(
    name: &str,
    avatar: Option<&str>,
    result: Segment,
    remaining: i64,
    at: DateTime<Utc>,
) -> WebhookPayload {
    single(Embed {
        title: "🎡  New Spin!".to_string(),
        color: result.color(),
        thumbnail: avatar.map(|url| Thumbnail {
            url: url.to_string(),
        }),
        fields: vec![
            field("👤 Player", name, true),
            field("🎯 Result", result.label(), true),
            field("🔁 Spins left today", &remaining.to_string(), true),
        ],
        footer: Footer {
            text: "Spin of Fate".to_string(),
        },
        timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Notification for an accepted segment request.
pub fn request_payload(
    name: &str,
    avatar: Option<&str>,
    request: &str,
    at: DateTime<Utc>,
) -> WebhookPayload {
    single(Embed {
        title: "📬  New Segment Request!".to_string(),
        color: REQUEST_COLOR,
        thumbnail: avatar.map(|url| Thumbnail {
            url: url.to_string(),
        }),
        fields: vec![field("👤 From", name, true), field("💡 Request", request, false)],
        footer: Footer {
            text: "Spin of Fate — Requests".to_string(),
        },
        timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
