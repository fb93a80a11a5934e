//! releasio-fin (Financials & Payouts) - Royalty aggregation service
//!
//! Serves monthly payout summaries, per-collaborator breakdowns and the
//! payout-run ledger over the shared Releasio catalog database. All
//! financial figures are derived from the source releases on every
//! request.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use releasio_common::config::{database_path, resolve_root_folder};
use releasio_common::db;
use releasio_fin::{build_router, AppState};

/// Command-line arguments for releasio-fin
#[derive(Parser, Debug)]
#[command(name = "releasio-fin")]
#[command(about = "Financials & Payouts service for Releasio")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5850", env = "RELEASIO_FIN_PORT")]
    port: u16,

    /// Root folder holding releasio.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Releasio Financials (releasio-fin) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "RELEASIO_ROOT_FOLDER")
        .context("Failed to resolve root folder")?;
    std::fs::create_dir_all(&root_folder)
        .with_context(|| format!("Failed to create root folder {}", root_folder.display()))?;

    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    // Create application state and router
    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("releasio-fin listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
