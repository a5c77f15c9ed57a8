use std::time::Duration;

use futures::Stream;
use futures::TryStreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;

use super::models::{ApiConfig, AuthRequest, TokenResponse};
use crate::domain::Report;

/// No cancellation is exposed, so every request carries a fixed deadline
/// instead of hanging forever on a dead connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("authentication response did not contain a token")]
    MissingToken,

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Exchange credentials for a short-lived access token.
    ///
    /// One request, no retries; the token is handed back to the caller and
    /// never stored. Any non-success status, transport failure, or reply
    /// without a token is an error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let url = self.config.auth_url()?;
        log::debug!("requesting access token for {}", username);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(&AuthRequest { username, password })
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let body: TokenResponse = response.json().await?;
        body.token
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingToken)
    }

    /// Fetch a report's feed as a byte stream, authenticated by `token`.
    ///
    /// Returns the content length (when the server reports one) and the
    /// body stream for the caller to drain to disk.
    pub async fn fetch_feed_stream(
        &self,
        report: Report,
        token: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let url = self.config.feed_url(report)?;
        log::debug!("fetching {} feed from {}", report.label(), url);

        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .header("X-Auth-Token", token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::Request);

        Ok((total_size, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig::new(&server.url()).unwrap())
    }

    #[tokio::test]
    async fn test_authenticate_returns_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/authenticate")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "username": "alice",
                "password": "hunter2",
            })))
            .with_status(200)
            .with_body(r#"{"token": "abc123"}"#)
            .create_async()
            .await;

        let token = client_for(&server)
            .authenticate("alice", "hunter2")
            .await
            .unwrap();

        assert_eq!(token, "abc123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_rejected_credentials() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/authenticate")
            .with_status(401)
            .create_async()
            .await;

        let err = client_for(&server)
            .authenticate("alice", "wrong")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Request(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_authenticate_response_without_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/authenticate")
            .with_status(200)
            .with_body(r#"{"error": "account locked"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .authenticate("alice", "hunter2")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn test_fetch_feed_stream_sends_token_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/staticfeeds/2.0/fares")
            .match_header("x-auth-token", "abc123")
            .match_header("accept", "*/*")
            .with_status(200)
            .with_body(b"PK\x03\x04feed-bytes")
            .create_async()
            .await;

        let (total, stream) = client_for(&server)
            .fetch_feed_stream(Report::Fares, "abc123")
            .await
            .unwrap();

        let mut body = Vec::new();
        let mut stream = stream.boxed();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }

        assert_eq!(total, Some(body.len() as u64));
        assert_eq!(body, b"PK\x03\x04feed-bytes");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_feed_stream_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/staticfeeds/3.0/timetable")
            .with_status(500)
            .create_async()
            .await;

        let err = match client_for(&server)
            .fetch_feed_stream(Report::Timetable, "abc123")
            .await
        {
            Err(e) => e,
            Ok(_) => panic!("expected failure status to be an error"),
        };

        assert!(matches!(err, ApiError::Request(_)));
        assert!(err.to_string().contains("500"));
    }
}
