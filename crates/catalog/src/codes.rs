//! QR code generation for product pages.
//!
//! Codes are rendered by an external image service and embedded in the
//! product document as a `data:` URI, so the admin can print them without a
//! second request.
//!
//! # Service Contract
//!
//! `GET {service}?data={url}&size=200x200` returns the PNG body.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

/// Rendered code size in pixels.
const CODE_SIZE: &str = "200x200";

/// Errors that can occur when generating a code.
#[derive(Debug, Error)]
pub enum CodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("code service returned status {0}")]
    Status(u16),

    /// Service returned no image data.
    #[error("code service returned an empty body")]
    EmptyBody,
}

/// Produces an image data URI encoding a URL.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Render a code for `url` as a `data:` URI.
    async fn generate(&self, url: &str) -> Result<String, CodeError>;
}

/// Code generator calling an HTTP rendering service.
#[derive(Clone)]
pub struct HttpCodeGenerator {
    inner: Arc<HttpCodeGeneratorInner>,
}

struct HttpCodeGeneratorInner {
    client: reqwest::Client,
    service: Url,
}

impl std::fmt::Debug for HttpCodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCodeGenerator")
            .field("service", &self.inner.service.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpCodeGenerator {
    /// Create a generator for the service at `service`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(service: Url) -> Result<Self, CodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpCodeGeneratorInner { client, service }),
        })
    }

    fn endpoint(&self, url: &str) -> Url {
        let mut endpoint = self.inner.service.clone();
        endpoint
            .query_pairs_mut()
            .append_pair("data", url)
            .append_pair("size", CODE_SIZE);
        endpoint
    }
}

#[async_trait]
impl CodeGenerator for HttpCodeGenerator {
    #[tracing::instrument(skip(self))]
    async fn generate(&self, url: &str) -> Result<String, CodeError> {
        let response = self.inner.client.get(self.endpoint(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CodeError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("image/"))
            .unwrap_or("image/png")
            .to_owned();

        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(CodeError::EmptyBody);
        }

        Ok(format!("data:{content_type};base64,{}", STANDARD.encode(&body)))
    }
}
