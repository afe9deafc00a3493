//! Test doubles shared by the step definitions

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use streamwatch::io::{HttpClient, HttpResponse};
use streamwatch::monitor::{StatusFetcher, StatusMap};
use streamwatch::notifier::{Notification, Notifier};
use streamwatch::StreamwatchError;

// --- Engine doubles ---

/// A status fetcher whose answers are set by the scenario
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pub live: RwLock<HashMap<String, bool>>,
    pub failing: RwLock<bool>,
    pub calls: RwLock<u32>,
}

impl ScriptedFetcher {
    pub async fn set_live(&self, channel: &str, live: bool) {
        self.live.write().await.insert(channel.to_string(), live);
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn call_count(&self) -> u32 {
        *self.calls.read().await
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch_status(&self, channels: &[String]) -> streamwatch::Result<StatusMap> {
        *self.calls.write().await += 1;
        if *self.failing.read().await {
            return Err(StreamwatchError::Fetch(
                "streams endpoint returned status 503".to_string(),
            ));
        }
        let live = self.live.read().await;
        Ok(channels
            .iter()
            .map(|c| (c.clone(), live.get(c).copied().unwrap_or(false)))
            .collect())
    }
}

/// A notifier that records notifications
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub records: RwLock<Vec<Notification>>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<Notification> {
        self.records.read().await.clone()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, notification: &Notification) -> streamwatch::Result<()> {
        self.records.write().await.push(notification.clone());
        Ok(())
    }
}

// --- HTTP doubles ---

/// Simulated Twitch endpoints
#[derive(Debug, Default)]
pub struct FakeTwitch {
    pub live: RwLock<HashSet<String>>,
    pub token_requests: RwLock<u32>,
    pub stream_queries: RwLock<Vec<Vec<String>>>,
    pub unauthorized_remaining: RwLock<u32>,
    /// (1-based query number, status) to fail with
    pub fail_query: RwLock<Option<(usize, u16)>>,
}

#[async_trait::async_trait]
impl HttpClient for FakeTwitch {
    async fn get(
        &self,
        _url: &str,
        query: &[(&str, &str)],
        _headers: &[(&str, &str)],
    ) -> streamwatch::Result<HttpResponse> {
        let logins: Vec<String> = query
            .iter()
            .filter(|(k, _)| *k == "user_login")
            .map(|(_, v)| v.to_string())
            .collect();

        let query_number = {
            let mut queries = self.stream_queries.write().await;
            queries.push(logins.clone());
            queries.len()
        };

        {
            let mut remaining = self.unauthorized_remaining.write().await;
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(HttpResponse {
                    status: 401,
                    body: r#"{"error":"Unauthorized","status":401,"message":"Invalid OAuth token"}"#
                        .to_string(),
                });
            }
        }

        if let Some((n, status)) = *self.fail_query.read().await {
            if n == query_number {
                return Ok(HttpResponse {
                    status,
                    body: "upstream error".to_string(),
                });
            }
        }

        // Helix echoes logins in its own casing; report them uppercased
        let live = self.live.read().await;
        let data: Vec<serde_json::Value> = logins
            .iter()
            .filter(|l| live.contains(*l))
            .map(|l| serde_json::json!({ "user_login": l.to_uppercase(), "type": "live" }))
            .collect();

        Ok(HttpResponse {
            status: 200,
            body: serde_json::json!({ "data": data, "pagination": {} }).to_string(),
        })
    }

    async fn post_query(
        &self,
        _url: &str,
        _query: &[(&str, &str)],
    ) -> streamwatch::Result<HttpResponse> {
        let mut count = self.token_requests.write().await;
        *count += 1;
        Ok(HttpResponse {
            status: 200,
            body: format!(
                r#"{{"access_token":"token-{}","expires_in":5000,"token_type":"bearer"}}"#,
                *count
            ),
        })
    }

    async fn post_json(
        &self,
        _url: &str,
        _query: &[(&str, &str)],
        _body: &serde_json::Value,
    ) -> streamwatch::Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            body: "{}".to_string(),
        })
    }
}
