//! Remote API boundary and data access facade
//!
//! [`GraphApi`] is the opaque remote collaborator: a generic request function
//! taking a verb, a resource path, and a parameter mapping, delivering the
//! response body as structured JSON. Its authentication protocol, rate
//! limits, and error shapes are not modeled here. [`HttpGraphClient`] is the
//! production implementation over HTTP.

pub mod facade;

pub use facade::{ContactFilter, DataProvider};

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ProviderError;

/// One shared HTTP client for the process; initialization is idempotent
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// HTTP-method-like verb accepted by the remote API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVerb {
    Get,
    Post,
    Delete,
}

impl ApiVerb {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVerb::Get => "get",
            ApiVerb::Post => "post",
            ApiVerb::Delete => "delete",
        }
    }
}

/// Opaque remote service boundary
///
/// One round trip per call, no retries, no pagination handling.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Perform one request against the remote resource `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be performed, the remote
    /// answers with a non-success status, or the body is not valid JSON.
    async fn request(
        &self,
        verb: ApiVerb,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ProviderError>;
}

/// HTTP implementation of the remote boundary
pub struct HttpGraphClient {
    endpoint: String,
}

impl HttpGraphClient {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn resource_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl GraphApi for HttpGraphClient {
    async fn request(
        &self,
        verb: ApiVerb,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ProviderError> {
        let url = self.resource_url(path);
        debug!("{} {url}", verb.as_str());

        let request = match verb {
            ApiVerb::Get => HTTP_CLIENT.get(&url),
            ApiVerb::Post => HTTP_CLIENT.post(&url),
            ApiVerb::Delete => HTTP_CLIENT.delete(&url),
        };
        let response = request
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("Request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RemoteStatus(status.as_u16(), body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Decode(format!("Response from {path} is not JSON: {e}")))
    }
}
