//! App access token cache for the Twitch Helix API

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::io::HttpClient;
use crate::StreamwatchError;

pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// A token is refreshed once it has less than this much validity left
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

const DEFAULT_LIFETIME_SECONDS: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// A bearer token and the instant it stops being valid
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: Instant,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Credential {
    /// True while at least [`EXPIRY_MARGIN`] of validity remains at `now`
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Obtains and caches a client-credentials token
pub struct TokenCache {
    client_id: String,
    client_secret: String,
    http: Arc<dyn HttpClient>,
    cached: Mutex<Option<Credential>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl TokenCache {
    pub fn new(client_id: &str, client_secret: &str, http: Arc<dyn HttpClient>) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            http,
            cached: Mutex::new(None),
        }
    }

    /// Return the cached credential, exchanging for a new one when it is
    /// missing or about to expire.
    pub async fn get_token(&self) -> crate::Result<Credential> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref() {
            if credential.is_fresh_at(Instant::now()) {
                return Ok(credential.clone());
            }
            tracing::debug!("Cached Twitch token is about to expire, refreshing");
        }

        let credential = self.exchange().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    /// Exchange for a new credential even if the cached one looks valid.
    ///
    /// `rejected` is the token the caller saw fail; if another caller already
    /// replaced it, the newer token is returned without a second exchange.
    pub async fn refresh(&self, rejected: &Credential) -> crate::Result<Credential> {
        let mut cached = self.cached.lock().await;
        if let Some(current) = cached.as_ref() {
            if current.access_token != rejected.access_token && current.is_fresh_at(Instant::now())
            {
                return Ok(current.clone());
            }
        }

        let credential = self.exchange().await?;
        *cached = Some(credential.clone());
        Ok(credential)
    }

    async fn exchange(&self) -> crate::Result<Credential> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post_query(TWITCH_TOKEN_URL, &params)
            .await
            .map_err(|e| StreamwatchError::Auth(e.to_string()))?;

        if !response.is_success() {
            return Err(StreamwatchError::Auth(format!(
                "token endpoint returned status {}: {}",
                response.status, response.body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| StreamwatchError::Auth(format!("malformed token response: {}", e)))?;
        let lifetime = parsed.expires_in.unwrap_or(DEFAULT_LIFETIME_SECONDS);

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(lifetime))
            .ok_or_else(|| {
                StreamwatchError::Auth(format!("token lifetime out of range: {} s", lifetime))
            })?;

        tracing::info!("Obtained new Twitch access token (valid {} s)", lifetime);
        Ok(Credential {
            access_token: parsed.access_token,
            expires_at,
        })
    }
}
