//! Twitch Helix live-streams client

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::io::{HttpClient, HttpResponse};
use crate::monitor::{StatusFetcher, StatusMap};
use crate::token::{Credential, TokenCache};
use crate::StreamwatchError;

pub const TWITCH_STREAMS_URL: &str = "https://api.twitch.tv/helix/streams";

/// Helix accepts at most this many `user_login` values per request
pub const MAX_LOGINS_PER_REQUEST: usize = 100;

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    data: Vec<LiveStream>,
}

#[derive(Debug, Deserialize)]
struct LiveStream {
    user_login: String,
}

/// Queries Helix for which of the given channels are live
pub struct TwitchStatusFetcher {
    client_id: String,
    tokens: TokenCache,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TwitchStatusFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchStatusFetcher")
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl TwitchStatusFetcher {
    pub fn new(client_id: &str, tokens: TokenCache, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created TwitchStatusFetcher for client '{}'", client_id);
        Self {
            client_id: client_id.to_string(),
            tokens,
            http,
        }
    }

    async fn query(&self, batch: &[String], credential: &Credential) -> crate::Result<HttpResponse> {
        let query: Vec<(&str, &str)> = batch.iter().map(|c| ("user_login", c.as_str())).collect();
        let bearer = format!("Bearer {}", credential.access_token);
        let headers = [
            ("Client-ID", self.client_id.as_str()),
            ("Authorization", bearer.as_str()),
        ];

        self.http
            .get(TWITCH_STREAMS_URL, &query, &headers)
            .await
            .map_err(|e| StreamwatchError::Fetch(e.to_string()))
    }

    /// Fetch one batch, refreshing the token and retrying once on 401
    async fn fetch_batch(&self, batch: &[String]) -> crate::Result<HashSet<String>> {
        let credential = self.tokens.get_token().await?;
        let mut response = self.query(batch, &credential).await?;

        if response.status == 401 {
            tracing::info!("Twitch rejected the access token, refreshing and retrying once");
            let refreshed = self.tokens.refresh(&credential).await?;
            response = self.query(batch, &refreshed).await?;
            if response.status == 401 {
                return Err(StreamwatchError::Unauthorized(response.body));
            }
        }

        if !response.is_success() {
            return Err(StreamwatchError::Fetch(format!(
                "streams endpoint returned status {}: {}",
                response.status, response.body
            )));
        }

        let parsed: StreamsResponse = serde_json::from_str(&response.body)
            .map_err(|e| StreamwatchError::Fetch(format!("malformed streams response: {}", e)))?;
        Ok(parsed
            .data
            .into_iter()
            .map(|s| s.user_login.to_lowercase())
            .collect())
    }
}

#[async_trait]
impl StatusFetcher for TwitchStatusFetcher {
    async fn fetch_status(&self, channels: &[String]) -> crate::Result<StatusMap> {
        let mut status = StatusMap::with_capacity(channels.len());

        for batch in channels.chunks(MAX_LOGINS_PER_REQUEST) {
            let live = self.fetch_batch(batch).await?;
            for name in batch {
                status.insert(name.clone(), live.contains(name));
            }
        }

        tracing::debug!(
            "Fetched status for {} channel(s), {} live",
            status.len(),
            status.values().filter(|live| **live).count()
        );
        Ok(status)
    }
}
