use std::path::{Path, PathBuf};

use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

use agent_portal::adapters::file_source::FileListingSource;
use agent_portal::adapters::fixtures::FixtureSource;
use agent_portal::adapters::map::headless::HeadlessMapProvider;
use agent_portal::config::load_config;
use agent_portal::mcp::server::AgentPortalServer;
use agent_portal::portal::session::PortalSession;
use agent_portal::ports::listing_source::ListingSource;

fn find_config_path() -> PathBuf {
    let candidates = [
        PathBuf::from("config.yaml"),
        binary_dir().join("config.yaml"),
    ];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn binary_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting agent-portal server");

    let config_path = find_config_path();
    let config = load_config(&config_path)?;

    let source: Box<dyn ListingSource> = match config.data.fixtures_path {
        Some(path) => Box::new(FileListingSource::new(path)),
        None => Box::new(FixtureSource),
    };
    let listings = source.load().await?;
    tracing::info!(
        source = source.source_name(),
        properties = listings.properties().len(),
        complexes = listings.complexes().len(),
        "Loaded listings"
    );

    let provider = HeadlessMapProvider::new();
    let mut session = PortalSession::new(listings, config.map);
    if !session.attach_map(&provider) {
        tracing::warn!("Map unavailable, serving listings without it");
    }

    let server = AgentPortalServer::new(session, provider);

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
