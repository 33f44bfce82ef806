//! Client layer: entity analysis requests and page fetching over a pluggable transport.

mod client;
mod error;
mod fetch;
pub mod transport;

pub use client::{Analysis, ENDPOINT, EntitiesClient, default_endpoint};
pub use error::ClientError;
pub use fetch::fetch_html_document;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{RawResponse, Transport};
pub use url::Url;
