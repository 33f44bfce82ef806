//! Demo web server: paste text into a form, get it back with entities highlighted.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use gcnl_client::EntitiesClient;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Index page shipped with the binary. `{{message}}` is replaced per request.
pub const INDEX_TEMPLATE: &str = include_str!("../static/index.html");

const MESSAGE_SLOT: &str = "{{message}}";
const EMPTY_CONTENT_MESSAGE: &str = "Error: Must provide content.";

/// Everything the server needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub credential: String,
    pub index_template: String,
}

impl ServerConfig {
    /// Fails when `credential` is empty; the server cannot do anything without it.
    pub fn new(addr: impl Into<String>, credential: impl Into<String>) -> anyhow::Result<Self> {
        let credential = credential.into();
        if credential.is_empty() {
            anyhow::bail!("must set GOOGLE_API_KEY environment variable");
        }
        Ok(Self {
            addr: addr.into(),
            credential,
            index_template: INDEX_TEMPLATE.to_string(),
        })
    }

    pub fn render_index(&self, message: Option<&str>) -> String {
        let message = message.map(escape_html).unwrap_or_default();
        self.index_template.replace(MESSAGE_SLOT, &message)
    }
}

/// Shared state for the request handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    client: EntitiesClient,
}

impl AppState {
    pub fn new(config: ServerConfig, client: EntitiesClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

#[derive(Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    html: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(analyze))
        .with_state(state)
}

/// Bind `config.addr` and serve until the process exits.
pub async fn serve(config: ServerConfig, client: EntitiesClient) -> anyhow::Result<()> {
    let addr = config.addr.clone();
    let app = router(AppState::new(config, client));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.config.render_index(None))
}

/// Escape the submitted text, analyse it and return the highlighted markup.
///
/// The escaped text is what gets analysed, so the returned offsets line up
/// with markup that is safe to insert into the page.
async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let content = escape_html(&form.content);
    if content.is_empty() {
        return Html(state.config.render_index(Some(EMPTY_CONTENT_MESSAGE))).into_response();
    }

    match state
        .client
        .from_plain_text(&state.config.credential, content)
        .await
    {
        Ok(analysis) => Json(AnalyzeResponse {
            html: analysis.annotate(),
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "entity analysis failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
