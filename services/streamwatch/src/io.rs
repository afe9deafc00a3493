//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// Timeout applied to every outbound request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with query parameters and extra headers.
    /// Query keys may repeat.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request whose parameters travel in the query string
    async fn post_query(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Debug)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| crate::StreamwatchError::Http(format!("Building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

async fn read_response(
    method: &str,
    url: &str,
    result: reqwest::Result<reqwest::Response>,
) -> crate::Result<HttpResponse> {
    let response = result.map_err(|e| {
        crate::StreamwatchError::Http(format!("{} {} failed: {}", method, url, e))
    })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| crate::StreamwatchError::Http(format!("Reading response body: {}", e)))?;

    tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
    Ok(HttpResponse { status, body })
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {} ({} query params)", url, query.len());
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        read_response("GET", url, request.send().await).await
    }

    async fn post_query(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let result = self.client.post(url).query(query).send().await;
        read_response("POST", url, result).await
    }

    async fn post_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {} (json)", url);
        let result = self.client.post(url).query(query).json(body).send().await;
        read_response("POST", url, result).await
    }
}
