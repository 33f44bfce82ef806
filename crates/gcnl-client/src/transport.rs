//! The network seam: one GET for page content, one JSON POST for analysis.

use async_trait::async_trait;
use url::Url;

use crate::ClientError;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can carry requests to the outside world.
///
/// Errors are only for failures to complete the exchange; a non-2xx status
/// is a normal [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, ClientError>;

    async fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<RawResponse, ClientError>;
}

/// [`Transport`] over a shared `reqwest::Client`.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, ClientError> {
        let resp = self.client.get(url.clone()).send().await?;
        read_response(resp).await
    }

    async fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<RawResponse, ClientError> {
        let resp = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        read_response(resp).await
    }
}

/// A success body must arrive whole; an error body is only diagnostic.
#[cfg(feature = "http")]
async fn read_response(resp: reqwest::Response) -> Result<RawResponse, ClientError> {
    let status = resp.status();
    let body = if status.is_success() {
        resp.text().await?
    } else {
        resp.text().await.unwrap_or_default()
    };
    Ok(RawResponse {
        status: status.as_u16(),
        body,
    })
}
