//! Change notification sinks.
//!
//! Notification delivery is fire-and-forget: a sink that fails to
//! deliver logs the failure and the cycle moves on. Price state is
//! already persisted by the time a notifier runs, so a lost message is
//! only a lost message.

use async_trait::async_trait;

/// A destination for price-change alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, id: &str, title: &str, body: &str);
}

/// Emits alerts as structured log lines. The default sink.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, id: &str, title: &str, body: &str) {
        tracing::info!(%id, %title, %body, "price alert");
    }
}

/// POSTs alerts as JSON to a configured endpoint.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, id: &str, title: &str, body: &str) {
        let payload = serde_json::json!({
            "id": id,
            "title": title,
            "body": body,
        });
        if let Err(e) = self.client.post(&self.url).json(&payload).send().await {
            tracing::warn!(url = %self.url, "webhook notification failed: {e:#}");
        }
    }
}
