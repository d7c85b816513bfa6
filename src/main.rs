mod config;
mod engine;
mod protocol;
mod server;

use anyhow::Result;
use config::DaemonConfig;
use engine::SuggestionEngine;
use server::SuggestionServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DaemonConfig::load()?;
    info!(
        socket = %config.server.socket_path.display(),
        dictionaries_dir = %config.paths.dictionaries_dir.display(),
        data_dir = %config.paths.data_dir.display(),
        "loaded suggestd config"
    );

    let engine = SuggestionEngine::new(&config.paths)?;
    info!(dictionaries = engine.dictionary_count(), "engine ready");

    let server = SuggestionServer::new(config.server.clone(), engine);
    server.run().await
}
