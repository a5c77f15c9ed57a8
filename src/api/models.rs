use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::Report;

/// Credential payload sent to the token endpoint.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from the token endpoint. The portal replies with more fields,
/// but only the token matters here; a reply without one is a failed login.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://opendata.nationalrail.co.uk")
                .expect("portal base URL is valid"),
        }
    }
}

impl ApiConfig {
    /// Point the client at a different portal, e.g. a local test server.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn auth_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join("/authenticate")
    }

    /// Resolve the fixed feed URL for a report.
    pub fn feed_url(&self, report: Report) -> Result<Url, url::ParseError> {
        self.base_url.join(report.feed_path())
    }
}
