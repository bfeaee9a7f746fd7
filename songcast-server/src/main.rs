use anyhow::Context;
use clap::Parser;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod handlers;
mod helpers;
mod session;
mod state;
mod types;


use catalog::Catalog;
use config::ServerConfig;

#[derive(Parser)]
#[command(name = "songcast-server", about = "Streams a directory of songs to songcast clients")]
struct Args {
    /// TCP port to listen on
    port: u16,

    /// Directory containing the songs to serve
    #[arg(value_parser = existing_dir)]
    music_dir: PathBuf,

    /// Address to bind
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Bytes per DATA chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// How long the inbound handler waits for a frame before re-checking the connection
    #[arg(long)]
    recv_timeout_ms: Option<u64>,

    /// File extension to include (repeatable)
    #[arg(long = "extension")]
    extensions: Vec<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(ms) = self.recv_timeout_ms {
            config.recv_timeout_ms = ms;
        }
        if !self.extensions.is_empty() {
            config.extensions = self
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        config
    }
}

fn existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("Directory '{s}' does not exist"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.apply(ServerConfig::load(args.config.as_deref())?);

    tracing::info!("Initializing catalog from {}", args.music_dir.display());
    let catalog = Catalog::load(&args.music_dir, &config.extensions, config.chunk_size)
        .with_context(|| format!("loading catalog from {}", args.music_dir.display()))?;
    if catalog.is_empty() {
        tracing::warn!("No songs matching {:?} found", config.extensions);
    } else {
        tracing::info!("Catalog ready with {} songs.", catalog.len());
    }

    let addr = SocketAddr::new(config.bind, args.port);
    let listener = session::bind(addr, config.listen_backlog)
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    session::serve(listener, Arc::new(catalog), Arc::new(config)).await
}
