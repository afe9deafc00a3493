//! Gotify notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::io::HttpClient;
use crate::notifier::{Notification, Notifier};

/// Gotify push sender
pub struct GotifyNotifier {
    message_url: String,
    token: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for GotifyNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GotifyNotifier")
            .field("message_url", &self.message_url)
            .finish()
    }
}

impl GotifyNotifier {
    pub fn new(base_url: &str, token: &str, http: Arc<dyn HttpClient>) -> Self {
        let message_url = format!("{}/message", base_url.trim_end_matches('/'));
        tracing::debug!("Created GotifyNotifier posting to {}", message_url);

        Self {
            message_url,
            token: token.to_string(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for GotifyNotifier {
    fn type_name(&self) -> &str {
        "gotify"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<()> {
        let body = serde_json::to_value(notification)?;

        tracing::debug!(
            "Sending Gotify notification: title='{}', priority={}",
            notification.title,
            notification.priority
        );

        let response = self
            .http
            .post_json(&self.message_url, &[("token", self.token.as_str())], &body)
            .await
            .map_err(|e| crate::StreamwatchError::Notify(e.to_string()))?;

        if response.status != 200 {
            return Err(crate::StreamwatchError::Notify(format!(
                "Gotify returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("Gotify notification sent successfully");
        Ok(())
    }
}
