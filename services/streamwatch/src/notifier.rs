//! Notifier trait and the notifications the monitor sends

use async_trait::async_trait;
use serde::Serialize;

/// A notification to be sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: u8,
}

impl Notification {
    pub fn startup() -> Self {
        Self {
            title: "✅ Twitch Monitor Started".to_string(),
            message: "This is a test notification to confirm Gotify is working.".to_string(),
            priority: 1,
        }
    }

    pub fn already_live(channel: &str) -> Self {
        Self {
            title: format!("{} is already LIVE 🎥", channel),
            message: format!("{} was already online at startup.", channel),
            priority: 4,
        }
    }

    pub fn went_live(channel: &str) -> Self {
        Self {
            title: format!("{} is LIVE 🎥", channel),
            message: format!("{} just went online.", channel),
            priority: 5,
        }
    }

    pub fn ended_stream(channel: &str) -> Self {
        Self {
            title: format!("{} is offline 💤", channel),
            message: format!("{} just ended the stream.", channel),
            priority: 3,
        }
    }
}

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "gotify")
    fn type_name(&self) -> &str;

    /// Send a notification
    async fn notify(&self, notification: &Notification) -> crate::Result<()>;
}

/// Send a notification, logging and discarding any failure
pub async fn notify_best_effort(notifier: &dyn Notifier, notification: &Notification) {
    match notifier.notify(notification).await {
        Ok(()) => tracing::info!("Sent {} notification: {}", notifier.type_name(), notification.title),
        Err(e) => tracing::error!(
            "{} notification '{}' failed: {}",
            notifier.type_name(),
            notification.title,
            e
        ),
    }
}
