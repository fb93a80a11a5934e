//! Database initialization
//!
//! Creates the database on first run and brings the schema up idempotently
//! (every CREATE is IF NOT EXISTS, safe to run on every startup).
//!
//! Only source-of-truth records are stored here: collaborators, releases,
//! royalty entries, master splits, the payout-run ledger and settings.
//! Derived payout summaries are never written to the database; they are
//! recomputed from these tables on every request.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Default display name for the primary artist until one is configured
pub const DEFAULT_ARTIST_NAME: &str = "Primary Artist";

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;

    Ok(pool)
}

/// Open an in-memory database with the full schema.
///
/// Single-connection pool: each SQLite `:memory:` connection is its own
/// database, so the pool must not open a second one. Used by tests and
/// ad-hoc tooling.
pub async fn init_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Apply pragmas and create all tables (idempotent)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    // Set busy timeout
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    create_settings_table(pool).await?;
    create_collaborators_table(pool).await?;
    create_releases_table(pool).await?;
    create_royalty_entries_table(pool).await?;
    create_master_splits_table(pool).await?;
    create_payout_runs_table(pool).await?;

    init_default_settings(pool).await?;

    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_collaborators_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS collaborators (
            guid TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            email TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_releases_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS releases (
            guid TEXT PRIMARY KEY,
            artist TEXT NOT NULL,
            title TEXT NOT NULL,
            release_date TEXT
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_royalty_entries_table(pool: &SqlitePool) -> Result<()> {
    // Rows are append-only; the same month may appear repeatedly for one
    // release and every row counts toward that month's total.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS royalty_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            release_guid TEXT NOT NULL REFERENCES releases(guid) ON DELETE CASCADE,
            month TEXT NOT NULL,
            earnings INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_royalty_entries_release
         ON royalty_entries(release_guid)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_master_splits_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS master_splits (
            release_guid TEXT NOT NULL REFERENCES releases(guid) ON DELETE CASCADE,
            collaborator_guid TEXT NOT NULL REFERENCES collaborators(guid),
            percentage REAL NOT NULL,
            PRIMARY KEY (release_guid, collaborator_guid)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_payout_runs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS payout_runs (
            month TEXT PRIMARY KEY,
            total_payouts REAL NOT NULL,
            paid_date TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Initialize default settings (only where no value exists yet)
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES ('artist_name', ?)")
        .bind(DEFAULT_ARTIST_NAME)
        .execute(pool)
        .await?;
    Ok(())
}
