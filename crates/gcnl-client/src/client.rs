//! Client for the `documents:analyzeEntities` endpoint.

use std::sync::Arc;

use gcnl_core::{Document, Encoding, Entity, EntityGroups, annotate_document};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::fetch::fetch_html_document;
use crate::transport::Transport;
use crate::ClientError;

/// Entity analysis endpoint of the Cloud Natural Language API.
pub const ENDPOINT: &str = "https://language.googleapis.com/v1beta1/documents:analyzeEntities";

/// Body of an analyzeEntities call.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    document: &'a Document,
    encoding_type: Encoding,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    entities: Vec<Entity>,
}

/// A submitted document together with the entities found in it.
///
/// Mention offsets in `groups` refer to `document.content()`.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub document: Document,
    pub groups: EntityGroups,
}

impl Analysis {
    /// Highlight every mention in the submitted content.
    pub fn annotate(&self) -> String {
        annotate_document(&self.document, &self.groups)
    }
}

/// Entity analysis client.
///
/// Holds no per-request state; clones share the underlying transport.
#[derive(Clone)]
pub struct EntitiesClient {
    transport: Arc<dyn Transport>,
    endpoint: Url,
}

#[cfg(feature = "http")]
impl Default for EntitiesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitiesClient {
    /// Client for the public [`ENDPOINT`] over HTTPS.
    #[cfg(feature = "http")]
    pub fn new() -> Self {
        Self::with_transport(
            Arc::new(crate::transport::HttpTransport::new()),
            default_endpoint(),
        )
    }

    /// Client for a different endpoint (a proxy or a local stand-in).
    #[cfg(feature = "http")]
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self::with_transport(
            Arc::new(crate::transport::HttpTransport::new()),
            Url::parse(endpoint)?,
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, endpoint: Url) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Analyse `doc` and group the entities found by type.
    ///
    /// An empty `credential` fails before anything is sent.
    pub async fn submit(
        &self,
        credential: &str,
        doc: &Document,
    ) -> Result<EntityGroups, ClientError> {
        if credential.is_empty() {
            return Err(ClientError::MissingCredential);
        }

        let body = serde_json::to_vec(&AnalyzeRequest {
            document: doc,
            encoding_type: Encoding::Utf8,
        })
        .map_err(ClientError::Encode)?;

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", credential);

        info!(
            endpoint = %self.endpoint,
            content_type = doc.content_type().as_str(),
            bytes = doc.content().len(),
            "submitting document for entity analysis"
        );
        let resp = self.transport.post_json(&url, body).await?;
        if resp.status != 200 {
            warn!(status = resp.status, "entity analysis rejected");
            return Err(ClientError::RemoteService {
                status: resp.status,
                body: resp.body,
            });
        }

        let parsed: AnalyzeResponse = serde_json::from_str(&resp.body)?;
        let groups = EntityGroups::from_entities(parsed.entities);
        info!(
            entities = groups.len(),
            types = groups.type_count(),
            "entity analysis complete"
        );
        Ok(groups)
    }

    /// Analyse a plain-text string.
    pub async fn from_plain_text(
        &self,
        credential: &str,
        content: impl Into<String>,
    ) -> Result<Analysis, ClientError> {
        let document = Document::plain_text(content);
        let groups = self.submit(credential, &document).await?;
        Ok(Analysis { document, groups })
    }

    /// Fetch the HTML at `url` and analyse it.
    pub async fn from_url(&self, credential: &str, url: &str) -> Result<Analysis, ClientError> {
        if credential.is_empty() {
            return Err(ClientError::MissingCredential);
        }
        let document = fetch_html_document(self.transport.as_ref(), url).await?;
        let groups = self.submit(credential, &document).await?;
        Ok(Analysis { document, groups })
    }
}

/// [`ENDPOINT`] as a parsed URL.
pub fn default_endpoint() -> Url {
    Url::parse(ENDPOINT).expect("ENDPOINT is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RawResponse;
    use async_trait::async_trait;
    use gcnl_core::EntityType;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Get(String),
        Post(String, serde_json::Value),
    }

    /// Replays canned responses in order and records every call.
    #[derive(Default)]
    struct ReplayTransport {
        responses: Mutex<VecDeque<Result<RawResponse, ClientError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ReplayTransport {
        fn with(responses: Vec<Result<RawResponse, ClientError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next(&self) -> Result<RawResponse, ClientError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Other("no response queued".into())))
        }
    }

    #[async_trait]
    impl Transport for ReplayTransport {
        async fn get(&self, url: &Url) -> Result<RawResponse, ClientError> {
            self.calls.lock().unwrap().push(Call::Get(url.to_string()));
            self.next()
        }

        async fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<RawResponse, ClientError> {
            let json = serde_json::from_slice(&body).unwrap();
            self.calls
                .lock()
                .unwrap()
                .push(Call::Post(url.to_string(), json));
            self.next()
        }
    }

    fn client(transport: Arc<ReplayTransport>) -> EntitiesClient {
        EntitiesClient::with_transport(transport, default_endpoint())
    }

    const PARIS_RESPONSE: &str = r#"{
        "entities": [
            {
                "name": "Paris",
                "type": "LOCATION",
                "metadata": {"wikipedia_url": "https://en.wikipedia.org/wiki/Paris"},
                "salience": 0.9,
                "mentions": [{"text": {"content": "Paris", "beginOffset": 0}}]
            },
            {
                "name": "Victor Hugo",
                "type": "PERSON",
                "salience": 0.07,
                "mentions": [{"text": {"content": "Victor Hugo", "beginOffset": 18}}]
            },
            {
                "name": "Lyon",
                "type": "LOCATION",
                "salience": 0.03,
                "mentions": [{"text": {"content": "Lyon", "beginOffset": 35}}]
            }
        ],
        "language": "en"
    }"#;

    #[test]
    fn default_endpoint_parses() {
        assert_eq!(default_endpoint().as_str(), ENDPOINT);
    }

    #[tokio::test]
    async fn empty_credential_makes_no_call() {
        let transport = ReplayTransport::with(vec![]);
        let client = client(transport.clone());

        let err = client
            .submit("", &Document::plain_text("Paris is nice"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));

        let err = client.from_url("", "https://example.com").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn request_carries_document_encoding_and_key() {
        let transport = ReplayTransport::with(vec![Ok(RawResponse::new(200, "{}"))]);
        let client = client(transport.clone());

        client
            .submit("s3cr3t&x", &Document::plain_text("Paris is nice"))
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let Call::Post(url, body) = &calls[0] else {
            panic!("expected a POST, got {:?}", calls[0]);
        };
        assert_eq!(url, &format!("{ENDPOINT}?key=s3cr3t%26x"));
        assert_eq!(
            body,
            &serde_json::json!({
                "document": {"type": "PLAIN_TEXT", "language": "en", "content": "Paris is nice"},
                "encodingType": "UTF8"
            })
        );
    }

    #[tokio::test]
    async fn groups_entities_by_type() {
        let transport = ReplayTransport::with(vec![Ok(RawResponse::new(200, PARIS_RESPONSE))]);
        let groups = client(transport)
            .submit("key", &Document::plain_text("ignored"))
            .await
            .unwrap();

        assert_eq!(groups.len(), 3);
        let locations: Vec<&str> = groups
            .get(EntityType::Location)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(locations, ["Paris", "Lyon"]);
        assert_eq!(groups.get(EntityType::Person)[0].name, "Victor Hugo");
        assert!(groups.get(EntityType::Location)[1].metadata.is_empty());
    }

    #[tokio::test]
    async fn missing_entities_key_is_empty() {
        let transport = ReplayTransport::with(vec![Ok(RawResponse::new(200, r#"{"language":"en"}"#))]);
        let groups = client(transport)
            .submit("key", &Document::plain_text("nothing here"))
            .await
            .unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn non_200_is_remote_service_error() {
        let transport = ReplayTransport::with(vec![Ok(RawResponse::new(
            403,
            r#"{"error": {"code": 403, "message": "API key not valid"}}"#,
        ))]);
        let err = client(transport)
            .submit("bad-key", &Document::plain_text("Paris"))
            .await
            .unwrap_err();

        match err {
            ClientError::RemoteService { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected RemoteService, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let transport = ReplayTransport::with(vec![
            Ok(RawResponse::new(200, "<html>not json</html>")),
            Ok(RawResponse::new(200, r#"{"entities": [{"name": "x"}]}"#)),
        ]);
        let client = client(transport);
        let doc = Document::plain_text("x");

        let err = client.submit("key", &doc).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        let err = client.submit("key", &doc).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let transport =
            ReplayTransport::with(vec![Err(ClientError::Other("connection reset".into()))]);
        let err = client(transport)
            .submit("key", &Document::plain_text("x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn from_plain_text_keeps_document_for_annotation() {
        let transport = ReplayTransport::with(vec![Ok(RawResponse::new(
            200,
            r#"{"entities": [{"name": "Paris", "type": "LOCATION", "salience": 0.9,
                "mentions": [{"text": {"content": "Paris", "beginOffset": 0}}]}]}"#,
        ))]);
        let analysis = client(transport)
            .from_plain_text("key", "Paris is nice")
            .await
            .unwrap();

        assert_eq!(analysis.document.content(), "Paris is nice");
        assert_eq!(
            analysis.annotate(),
            r#"<span class="type-LOCATION" data-toggle="tooltip" title="LOCATION (0.900000)">Paris</span> is nice"#
        );
    }

    #[tokio::test]
    async fn from_url_fetches_then_submits_html() {
        let transport = ReplayTransport::with(vec![
            Ok(RawResponse::new(200, "<p>Paris</p>")),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let analysis = client(transport.clone())
            .from_url("key", "https://example.com/page")
            .await
            .unwrap();

        assert_eq!(analysis.document.content(), "<p>Paris</p>");
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::Get("https://example.com/page".into()));
        let Call::Post(_, body) = &calls[1] else {
            panic!("expected a POST, got {:?}", calls[1]);
        };
        assert_eq!(body["document"]["type"], "HTML");
    }

    #[tokio::test]
    async fn from_url_fetch_failure_skips_analysis() {
        let transport = ReplayTransport::with(vec![Ok(RawResponse::new(404, "not found"))]);
        let err = client(transport.clone())
            .from_url("key", "https://example.com/missing")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Fetch { .. }));
        assert_eq!(transport.calls().len(), 1);
    }
}
