mod display;
mod server;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gcnl_client::{Analysis, EntitiesClient};
use gcnl_core::EntityType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gcnl", version, about = "Cloud Natural Language entity extraction and highlighting")]
struct Cli {
    /// API key for the Natural Language API.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// analyzeEntities endpoint.
    #[arg(long, env = "GCNL_ENDPOINT", default_value = gcnl_client::ENDPOINT, global = true)]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the demo web server.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "GCNL_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },
    /// Print the source with every entity mention highlighted.
    Annotate(Source),
    /// List the entities found, grouped by type.
    Entities {
        #[command(flatten)]
        source: Source,
        /// Only show entities of this type (e.g. PERSON, location).
        #[arg(long = "type")]
        entity_type: Option<EntityType>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Plain text to analyse.
    #[arg(long)]
    text: Option<String>,
    /// URL of an HTML page to analyse.
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("gcnl=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = EntitiesClient::with_endpoint(&cli.endpoint)
        .with_context(|| format!("invalid endpoint {}", cli.endpoint))?;
    let credential = cli.api_key.unwrap_or_default();

    match cli.command {
        Command::Serve { addr } => {
            tracing::info!("gcnl v{}", env!("CARGO_PKG_VERSION"));
            let config = server::ServerConfig::new(addr, credential)?;
            server::serve(config, client).await
        }
        Command::Annotate(source) => {
            let analysis = analyse(&client, &credential, source).await?;
            println!("{}", analysis.annotate());
            Ok(())
        }
        Command::Entities {
            source,
            entity_type,
        } => {
            let analysis = analyse(&client, &credential, source).await?;
            let groups = match entity_type {
                Some(ty) => analysis.groups.get(ty).iter().cloned().collect(),
                None => analysis.groups,
            };
            display::print_entity_groups(&groups);
            Ok(())
        }
    }
}

async fn analyse(
    client: &EntitiesClient,
    credential: &str,
    source: Source,
) -> anyhow::Result<Analysis> {
    match (source.text, source.url) {
        (Some(text), _) => client
            .from_plain_text(credential, text)
            .await
            .context("analysing text"),
        (None, Some(url)) => client
            .from_url(credential, &url)
            .await
            .with_context(|| format!("analysing {url}")),
        (None, None) => anyhow::bail!("either --text or --url is required"),
    }
}
