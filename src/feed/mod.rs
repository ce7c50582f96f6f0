pub mod classify;
pub mod models;

use std::{sync::Arc, time::Duration};

use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::debug;

/// Transport-level failure while fetching the feed. Body-level problems
/// (bad JSON, error payloads) are the classifier's business, not ours.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Http(StatusCode),
}

/// Cheaply cloneable handle to the scripted environment feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::builder()
                    .timeout(timeout)
                    .build()
                    .expect("Failed to build feed HTTP client"),
                url,
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Fetch one response body. The body is returned as raw text so the
    /// classifier can report decode failures with their own diagnostics.
    pub async fn fetch_body(&self) -> Result<String, FeedError> {
        debug!(url = %self.inner.url, "Requesting environment feed");

        let response = self
            .inner
            .http
            .get(&self.inner.url)
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Http(status));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::get, Router};

    use super::*;

    async fn spawn_feed(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn fetch_body_returns_the_payload() {
        let url = spawn_feed(Router::new().route("/", get(|| async { "[]" }))).await;
        let client = FeedClient::new(url, Duration::from_secs(2));

        assert_eq!(client.fetch_body().await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_as_http_error() {
        let router = Router::new().route(
            "/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let url = spawn_feed(router).await;
        let client = FeedClient::new(url, Duration::from_secs(2));

        let err = client.fetch_body().await.unwrap_err();
        assert!(matches!(err, FeedError::Http(status) if status.as_u16() == 503));
        assert_eq!(err.to_string(), "feed returned HTTP 503 Service Unavailable");
    }

    #[tokio::test]
    async fn unreachable_feed_is_a_network_error() {
        let client = FeedClient::new("http://127.0.0.1:1/".to_owned(), Duration::from_millis(200));

        assert!(matches!(
            client.fetch_body().await.unwrap_err(),
            FeedError::Network(_)
        ));
    }
}
