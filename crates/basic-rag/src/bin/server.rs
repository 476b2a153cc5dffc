//! RAG Server binary
//!
//! Run with: cargo run -p basic-rag --bin basic-rag-server -- --config rag.toml

use basic_rag::{config::RagConfig, server::RagServer};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Question answering RAG service
#[derive(Debug, Parser)]
#[command(name = "basic-rag-server", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "BASIC_RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "basic_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Model: {} ({:?})", config.generator.model, config.generator.task);
    tracing::info!("  - Ollama: {}", config.generator.base_url);
    tracing::info!("  - BM25: {:?}, top_k {}", config.store.bm25_algorithm, config.retriever.top_k);

    let server = RagServer::new(config)?;

    if !server.state().pipeline().generator().health_check().await? {
        tracing::warn!(
            "Ollama not available at {}; /ask will fail until it is running",
            server.state().config().generator.base_url
        );
        tracing::warn!(
            "  Pull the model with: ollama pull {}",
            server.state().config().generator.model
        );
    }

    tracing::info!("  API: http://{}/ask", server.address());
    tracing::info!("  Health: http://{}/health", server.address());

    server.start().await?;

    Ok(())
}
