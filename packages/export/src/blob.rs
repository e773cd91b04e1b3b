// ABOUTME: Client for publishing exported documents to blob storage
// ABOUTME: Uploads are best-effort; a missing token downgrades to a skipped upload

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

const BLOB_API_BASE: &str = "https://blob.vercel-storage.com";
const BLOB_API_VERSION: &str = "7";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Blob store returned {status}: {message}")]
    Upload { status: u16, message: String },

    #[error("Invalid blob store response: {0}")]
    InvalidResponse(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Deserialize)]
struct PutBlobResponse {
    url: String,
}

/// Client for the blob store the exported documents are published to.
///
/// The read/write token is optional: without one, uploads are skipped with a
/// warning and callers receive `None` instead of a URL. Export is a side
/// channel and must never fail the main generation flow over missing
/// credentials.
#[derive(Clone)]
pub struct BlobClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BlobClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: BLOB_API_BASE.to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Creates a client pointed at a custom blob store URL (used in tests).
    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new(token)
        }
    }

    /// Whether a storage token is configured.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Upload a file with public access and return its public URL, or `None`
    /// when no storage token is configured.
    pub async fn put(
        &self,
        filename: &str,
        content: String,
        content_type: &str,
    ) -> ExportResult<Option<String>> {
        let Some(token) = &self.token else {
            warn!(
                "BLOB_READ_WRITE_TOKEN not set - skipping upload of {}",
                filename
            );
            return Ok(None);
        };

        let response = self
            .client
            .put(format!("{}/{}", self.base_url, filename))
            .bearer_auth(token)
            .header("x-api-version", BLOB_API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "0")
            .body(content)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExportError::Upload {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let blob: PutBlobResponse = response
            .json()
            .await
            .map_err(|e| ExportError::InvalidResponse(e.to_string()))?;

        info!("Uploaded {} to blob storage", filename);
        Ok(Some(blob.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_put_without_token_skips_upload() {
        let client = BlobClient::new(None);

        let url = client
            .put("proposal-1.txt", "hello".to_string(), "text/plain")
            .await
            .unwrap();

        assert!(url.is_none());
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_put_empty_token_counts_as_unconfigured() {
        let client = BlobClient::new(Some(String::new()));
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_put_uploads_and_returns_public_url() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/proposal-1.x83"))
            .and(header("authorization", "Bearer blob-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://blob.example.com/proposal-1.x83",
                "pathname": "proposal-1.x83",
                "contentType": "application/xml"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BlobClient::with_base_url(Some("blob-token".to_string()), server.uri());
        let url = client
            .put("proposal-1.x83", "<GAEB/>".to_string(), "application/xml")
            .await
            .unwrap();

        assert_eq!(url.as_deref(), Some("https://blob.example.com/proposal-1.x83"));
    }

    #[tokio::test]
    async fn test_put_maps_store_errors() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = BlobClient::with_base_url(Some("bad-token".to_string()), server.uri());
        let err = client
            .put("proposal-1.txt", "hello".to_string(), "text/plain")
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Upload { status: 403, .. }));
    }
}
