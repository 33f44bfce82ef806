use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("must provide an API key")]
    MissingCredential,

    #[error("fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("entities API returned {status}: {body}")]
    RemoteService { status: u16, body: String },

    #[error("could not encode entities request: {0}")]
    Encode(serde_json::Error),

    #[error("could not decode entities response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Never carries the request URL: it holds the API key.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}
