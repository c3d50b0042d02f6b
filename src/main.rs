//! git-heatmap - fade source lines by how long ago git last touched them
//!
//! # Usage
//! ```bash
//! git-heatmap                        # Start the editor daemon on :3002
//! git-heatmap serve --port 4000      # Same, on another port
//! git-heatmap show src/main.rs       # Print a file shaded by line age
//! git-heatmap show src/main.rs --json
//! ```

mod config;
mod error;
mod git;
mod heatmap;
mod models;
mod routes;
mod terminal;
#[cfg(test)]
mod testutils;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{HeatmapArgs, Settings};
use heatmap::HeatmapService;

const DEFAULT_PORT: u16 = 3002;

/// Fade source lines by how long ago git last touched them
#[derive(Parser)]
#[command(name = "git-heatmap")]
#[command(about = "Line-age heatmaps from git blame", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    heatmap: HeatmapArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daemon editor plugins post events to (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Print a file with each line shaded by its age
    Show {
        /// File inside a git work tree
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print opacity batches as JSON instead
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = cli.heatmap.settings()?;

    match cli.command.unwrap_or(Commands::Serve { port: DEFAULT_PORT }) {
        Commands::Show { file, json } => terminal::show(&settings.heatmap(), &file, json).await,
        Commands::Serve { port } => serve(&settings, port).await,
    }
}

async fn serve(settings: &Settings, port: u16) -> anyhow::Result<()> {
    let service = HeatmapService::new(settings.heatmap());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(Arc::new(service)))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    tracing::info!("Heatmap daemon listening on http://{}", addr);
    println!();
    println!("  git-heatmap daemon");
    println!("  Events:  POST http://{}/api/v1/sessions/<id>/events", addr);
    println!("  Opacity: {} (oldest) .. {} (newest)", settings.scale.min(), settings.scale.max());
    println!("  git:     {}", settings.git.display());
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
