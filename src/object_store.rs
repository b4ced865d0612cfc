//! Remote object-storage client.
//!
//! Wraps the blob-storage REST API behind the [`ObjectStore`] trait:
//! resolve the account-scoped namespace with a single round trip, and fetch
//! an object by `(namespace, container, key)`. Requests are signed with the
//! scheme in [`crate::signing`].
//!
//! The client does not cache and has no side effects beyond the network
//! call. An absent key is reported as [`DocpipeError::NotFound`], since the
//! output artifact may simply not have been written yet; every other
//! transport or permission failure is [`DocpipeError::Storage`].

use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

use crate::credentials::Credentials;
use crate::error::{DocpipeError, Result};
use crate::signing;

/// Blob-storage operations the pipeline depends on.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Resolve the account-scoped storage namespace.
    async fn resolve_namespace(&self, credentials: &Credentials) -> Result<String>;

    /// Fetch one object's bytes.
    async fn get_object(
        &self,
        credentials: &Credentials,
        namespace: &str,
        container: &str,
        key: &str,
    ) -> Result<Vec<u8>>;
}

/// HTTP implementation of [`ObjectStore`].
pub struct ObjectStoreClient {
    http: reqwest::Client,
    endpoint: String,
    host: String,
    region: String,
}

impl ObjectStoreClient {
    /// Create a client for the given regional endpoint.
    ///
    /// `timeout` applies to each individual request.
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let host = host_of(&endpoint);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocpipeError::Storage(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            host,
            region: region.into(),
        })
    }

    async fn signed_get(&self, credentials: &Credentials, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.endpoint, path);
        let headers = signing::signed_headers(
            credentials,
            "GET",
            &self.host,
            path,
            "",
            b"",
            &self.region,
            "storage",
            Utc::now(),
        );

        let mut request = self.http.get(&url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        request
            .send()
            .await
            .map_err(|e| DocpipeError::Storage(format!("request to {} failed: {}", url, e)))
    }
}

#[async_trait]
impl ObjectStore for ObjectStoreClient {
    async fn resolve_namespace(&self, credentials: &Credentials) -> Result<String> {
        let response = self.signed_get(credentials, "/n").await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocpipeError::Storage(format!(
                "get-namespace failed (HTTP {}): {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        response
            .json::<String>()
            .await
            .map_err(|e| DocpipeError::Storage(format!("get-namespace returned an unreadable body: {}", e)))
    }

    async fn get_object(
        &self,
        credentials: &Credentials,
        namespace: &str,
        container: &str,
        key: &str,
    ) -> Result<Vec<u8>> {
        let path = object_path(namespace, container, key);
        let response = self.signed_get(credentials, &path).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DocpipeError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocpipeError::Storage(format!(
                "get-object failed for key '{}' (HTTP {}): {}",
                key,
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocpipeError::Storage(format!("get-object body read failed for key '{}': {}", key, e)))?;
        Ok(bytes.to_vec())
    }
}

/// Request path for one object, with each key segment URI-encoded.
fn object_path(namespace: &str, container: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(signing::uri_encode)
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "/n/{}/b/{}/o/{}",
        signing::uri_encode(namespace),
        signing::uri_encode(container),
        encoded_key
    )
}

/// Strip the URL scheme and any trailing slash, leaving the host for
/// signature computation.
fn host_of(endpoint: &str) -> String {
    endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_object_path_plain() {
        assert_eq!(
            object_path("acme", "outputs", "results/job-123/_/results/defaultObject.json"),
            "/n/acme/b/outputs/o/results/job-123/_/results/defaultObject.json"
        );
    }

    #[test]
    fn test_object_path_encodes_segments() {
        assert_eq!(
            object_path("acme", "out puts", "a b/c"),
            "/n/acme/b/out%20puts/o/a%20b/c"
        );
    }

    #[test]
    fn test_host_of_strips_scheme() {
        assert_eq!(host_of("https://storage.example.com"), "storage.example.com");
        assert_eq!(host_of("http://localhost:9000/"), "localhost:9000");
    }
}
