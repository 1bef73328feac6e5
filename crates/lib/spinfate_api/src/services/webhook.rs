//! Fire-and-forget webhook delivery.
//!
//! Delivery runs on a detached task. The handler never awaits it, nothing is
//! retried, and failures are only logged.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use spinfate_core::notify::WebhookPayload;

/// POST `payload` to `url` on a detached task.
///
/// The returned handle exists for tests; request handlers drop it.
pub fn dispatch(client: &reqwest::Client, url: &str, payload: WebhookPayload) -> JoinHandle<()> {
    let client = client.clone();
    let url = url.to_string();
    tokio::spawn(async move {
        match client.post(&url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(status = %resp.status(), "webhook delivered");
            }
            Ok(resp) => warn!(status = %resp.status(), "webhook rejected notification"),
            Err(e) => warn!("webhook delivery failed: {e}"),
        }
    })
}

/// Dispatch if a webhook is configured.
pub fn dispatch_if_configured(
    client: &reqwest::Client,
    url: Option<&str>,
    payload: impl FnOnce() -> WebhookPayload,
) -> Option<JoinHandle<()>> {
    url.map(|url| dispatch(client, url, payload()))
}
