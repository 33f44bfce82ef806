//! Fetching page content to analyse.

use gcnl_core::Document;
use tracing::info;
use url::Url;

use crate::transport::Transport;
use crate::ClientError;

/// GET `url` and wrap the body as an HTML [`Document`].
///
/// Any failure (bad URL, transport error, non-2xx status) is reported as
/// [`ClientError::Fetch`].
pub async fn fetch_html_document(
    transport: &dyn Transport,
    url: &str,
) -> Result<Document, ClientError> {
    let fetch_err = |reason: String| ClientError::Fetch {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| fetch_err(e.to_string()))?;

    info!(url = %parsed, "fetching document");
    let resp = transport
        .get(&parsed)
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    if !resp.is_success() {
        return Err(fetch_err(format!("returned {}", resp.status)));
    }

    info!(bytes = resp.body.len(), "fetched document");
    Ok(Document::html(resp.body))
}
