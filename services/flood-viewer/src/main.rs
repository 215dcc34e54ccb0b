//! Flood overlay viewer.
//!
//! Interactive viewer for flood simulation rasters published on a map server:
//! - Max-depth and time-series display modes
//! - Time step selection for time-indexed layers
//! - Layer catalog discovered from the server at startup
//! - Latest overlay image optionally written to disk

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use flood_common::ViewerConfig;
use flood_viewer::commands::{read_commands, HELP};
use flood_viewer::renderer::HttpOverlayRenderer;
use flood_viewer::session::{ViewerEvent, ViewerSession};
use wms_client::{discovery_for, http_client};

#[derive(Parser, Debug)]
#[command(name = "flood-viewer")]
#[command(about = "Interactive viewer for flood simulation overlays")]
struct Args {
    /// Viewer configuration file (YAML); built-in defaults when omitted
    #[arg(short, long, env = "FLOOD_VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Map server root, e.g. http://localhost:8080/geoserver
    #[arg(long, env = "GEOSERVER_URL")]
    base_url: Option<String>,

    /// Map server user
    #[arg(long, env = "GEOSERVER_USER")]
    username: Option<String>,

    /// Map server password
    #[arg(long, env = "GEOSERVER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Write the latest overlay image to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(username) = &args.username {
        config.credentials.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.credentials.password = password.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing; stdout belongs to the command front-end
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let logs = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if args.log_json {
        logs.json().init();
    } else {
        logs.init();
    }

    let config = load_config(&args)?;
    info!(
        base_url = %config.base_url(),
        workspace = %config.workspace,
        time_steps = config.max_time_step(),
        "Starting flood viewer"
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel();

    // Layer discovery, once
    let discovery = discovery_for(&config)?;
    let discovery_tx = events_tx.clone();
    tokio::spawn(async move {
        let layers = discovery.fetch_available_layers().await;
        discovery_tx.send(ViewerEvent::CatalogLoaded(layers)).ok();
    });

    // Command input
    tokio::spawn(read_commands(
        BufReader::new(tokio::io::stdin()),
        events_tx.clone(),
    ));

    // Handle Ctrl+C
    let signal_tx = events_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        signal_tx.send(ViewerEvent::Shutdown).ok();
    });

    let renderer = HttpOverlayRenderer::new(http_client()?, &config, events_tx, args.output.clone());
    let mut session = ViewerSession::new(
        &config,
        Box::new(renderer),
        events_rx,
        Box::new(io::stdout()),
    );

    println!("{}", HELP);
    session.run().await;

    // The stdin reader can still be parked in a blocking read.
    std::process::exit(0)
}
