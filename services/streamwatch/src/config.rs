//! Configuration for the streamwatch service
//!
//! All settings come from the process environment, optionally seeded from a
//! `.env` file.

use std::path::Path;
use std::time::Duration;

use crate::StreamwatchError;

const DEFAULT_POLL_SECONDS: u64 = 60;

/// Runtime configuration
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Lowercased, de-duplicated channel logins in configured order
    pub channels: Vec<String>,
    pub gotify_url: String,
    pub gotify_token: String,
    pub poll_interval: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("channels", &self.channels)
            .field("gotify_url", &self.gotify_url)
            .field("gotify_token", &"<redacted>")
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> crate::Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StreamwatchError::Config(format!("{} is not set", key)))
        };

        let poll_interval = match lookup("POLL_SECONDS") {
            Some(raw) if !raw.trim().is_empty() => parse_poll_seconds(&raw)?,
            _ => Duration::from_secs(DEFAULT_POLL_SECONDS),
        };

        Ok(Self {
            client_id: required("TWITCH_CLIENT_ID")?,
            client_secret: required("TWITCH_CLIENT_SECRET")?,
            channels: parse_channels(&lookup("CHANNELS").unwrap_or_default()),
            gotify_url: required("GOTIFY_URL")?,
            gotify_token: required("GOTIFY_TOKEN")?,
            poll_interval,
        })
    }

    /// Fail when nothing is configured to watch
    pub fn validate(&self) -> crate::Result<()> {
        if self.channels.is_empty() {
            return Err(StreamwatchError::Config(
                "no channels configured, set CHANNELS".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated channel list into normalized logins
pub fn parse_channels(raw: &str) -> Vec<String> {
    let mut channels: Vec<String> = Vec::new();
    for name in raw.split(',').map(|c| c.trim().to_lowercase()) {
        if !name.is_empty() && !channels.contains(&name) {
            channels.push(name);
        }
    }
    channels
}

fn parse_poll_seconds(raw: &str) -> crate::Result<Duration> {
    let seconds: u64 = raw.trim().parse().map_err(|e| {
        StreamwatchError::Config(format!("POLL_SECONDS must be an integer, got {:?}: {}", raw, e))
    })?;
    if seconds == 0 {
        return Err(StreamwatchError::Config(
            "POLL_SECONDS must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(seconds))
}

/// Load a `.env` file into the process environment if it exists.
///
/// Variables already present in the environment win.
pub fn load_env_file(path: &Path) -> crate::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StreamwatchError::Config(format!(
            "Failed to load env file {:?}: {}",
            path, e
        ))),
    }
}
