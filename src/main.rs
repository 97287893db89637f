use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use kitinit::browser;
use kitinit::cli::Cli;
use kitinit_config::{config_file_path, home_dir};
use kitinit_server::{prepare, StartupOptions, WizardServer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let home = home_dir().context("Couldn't find your home directory")?;
    let config_file = match cli.config {
        Some(path) => path,
        None => config_file_path().context("Couldn't work out where the config file goes")?,
    };

    let mut options = StartupOptions::new(config_file, home);
    options.assets_dir = cli.assets_dir;
    options.api_url = cli.api_url;
    options.repository = cli.repository;

    let state = prepare(options).await.context("Startup failed")?;

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let port = listener.local_addr()?.port();
    let url = format!("http://localhost:{}/", port);
    info!("listening on {}", url);

    if !cli.no_open {
        if let Err(e) = browser::open(&url) {
            warn!("Couldn't open a browser, visit {} yourself: {}", url, e);
        }
    }

    WizardServer::new(state)
        .start(listener)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
