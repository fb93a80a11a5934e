//! Queries over the catalog, settings and payout-run tables

use std::collections::{HashMap, HashSet};

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::catalog::{Collaborator, CollaboratorRole, MasterSplit, Release, RoyaltyEntry};
use crate::db::init::DEFAULT_ARTIST_NAME;
use crate::db::models::PayoutRun;
use crate::{Error, Result};

fn parse_guid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| Error::Internal(format!("Malformed guid in database: {}", value)))
}

fn parse_role(value: &str) -> Result<CollaboratorRole> {
    CollaboratorRole::parse(value)
        .ok_or_else(|| Error::Internal(format!("Unknown collaborator role in database: {}", value)))
}

// ========================================
// Settings
// ========================================

pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// The primary artist's display name
pub async fn artist_name(pool: &SqlitePool) -> Result<String> {
    Ok(get_setting(pool, "artist_name")
        .await?
        .unwrap_or_else(|| DEFAULT_ARTIST_NAME.to_string()))
}

// ========================================
// Collaborators
// ========================================

pub async fn insert_collaborator(pool: &SqlitePool, collaborator: &Collaborator) -> Result<()> {
    sqlx::query("INSERT INTO collaborators (guid, name, role, email) VALUES (?, ?, ?, ?)")
        .bind(collaborator.id.to_string())
        .bind(&collaborator.name)
        .bind(collaborator.role.as_str())
        .bind(&collaborator.email)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_collaborators(pool: &SqlitePool) -> Result<Vec<Collaborator>> {
    let rows = sqlx::query_as::<_, (String, String, String, String)>(
        "SELECT guid, name, role, email FROM collaborators ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(guid, name, role, email)| {
            Ok(Collaborator {
                id: parse_guid(&guid)?,
                name,
                role: parse_role(&role)?,
                email,
            })
        })
        .collect()
}

/// Guids of every known collaborator (for split validation)
pub async fn list_collaborator_ids(pool: &SqlitePool) -> Result<HashSet<Uuid>> {
    let rows = sqlx::query_as::<_, (String,)>("SELECT guid FROM collaborators")
        .fetch_all(pool)
        .await?;

    rows.iter().map(|(guid,)| parse_guid(guid)).collect()
}

// ========================================
// Releases
// ========================================

pub async fn insert_release(pool: &SqlitePool, release: &Release) -> Result<()> {
    sqlx::query("INSERT INTO releases (guid, artist, title, release_date) VALUES (?, ?, ?, ?)")
        .bind(release.id.to_string())
        .bind(&release.artist)
        .bind(&release.title)
        .bind(release.release_date.map(|d| d.to_string()))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn release_exists(pool: &SqlitePool, release_id: Uuid) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM releases WHERE guid = ?")
        .bind(release_id.to_string())
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Load the full catalog: every release with its master splits and royalty
/// entries attached, in insertion order. Royalty entries keep their
/// append order within each release.
pub async fn load_releases(pool: &SqlitePool) -> Result<Vec<Release>> {
    let release_rows = sqlx::query_as::<_, (String, String, String, Option<String>)>(
        "SELECT guid, artist, title, release_date FROM releases ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    let split_rows = sqlx::query_as::<_, (String, String, f64)>(
        "SELECT release_guid, collaborator_guid, percentage FROM master_splits ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    let royalty_rows = sqlx::query_as::<_, (String, String, i64)>(
        "SELECT release_guid, month, earnings FROM royalty_entries ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut splits_by_release: HashMap<String, Vec<MasterSplit>> = HashMap::new();
    for (release_guid, collaborator_guid, percentage) in split_rows {
        splits_by_release.entry(release_guid).or_default().push(MasterSplit {
            collaborator_id: parse_guid(&collaborator_guid)?,
            percentage,
        });
    }

    let mut royalties_by_release: HashMap<String, Vec<RoyaltyEntry>> = HashMap::new();
    for (release_guid, month, earnings) in royalty_rows {
        royalties_by_release
            .entry(release_guid)
            .or_default()
            .push(RoyaltyEntry { month, earnings });
    }

    release_rows
        .into_iter()
        .map(|(guid, artist, title, release_date)| {
            let release_date = match release_date {
                Some(date) => Some(date.parse().map_err(|_| {
                    Error::Internal(format!("Malformed release date in database: {}", date))
                })?),
                None => None,
            };
            Ok(Release {
                id: parse_guid(&guid)?,
                artist,
                title,
                release_date,
                master_splits: splits_by_release.remove(&guid).unwrap_or_default(),
                royalty_data: royalties_by_release.remove(&guid).unwrap_or_default(),
            })
        })
        .collect()
}

/// Append royalty entries to a release. Entries are never deduplicated;
/// a repeated month adds to that month's running total.
pub async fn append_royalty_entries(
    pool: &SqlitePool,
    release_id: Uuid,
    entries: &[RoyaltyEntry],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        sqlx::query("INSERT INTO royalty_entries (release_guid, month, earnings) VALUES (?, ?, ?)")
            .bind(release_id.to_string())
            .bind(&entry.month)
            .bind(entry.earnings)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Replace a release's master splits wholesale (the splits editor saves
/// the complete list, not a diff).
pub async fn replace_master_splits(
    pool: &SqlitePool,
    release_id: Uuid,
    splits: &[MasterSplit],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM master_splits WHERE release_guid = ?")
        .bind(release_id.to_string())
        .execute(&mut *tx)
        .await?;

    for split in splits {
        sqlx::query(
            "INSERT INTO master_splits (release_guid, collaborator_guid, percentage)
             VALUES (?, ?, ?)",
        )
        .bind(release_id.to_string())
        .bind(split.collaborator_id.to_string())
        .bind(split.percentage)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

// ========================================
// Payout runs
// ========================================

pub async fn get_payout_run(pool: &SqlitePool, month: &str) -> Result<Option<PayoutRun>> {
    let row = sqlx::query_as::<_, (String, f64, String)>(
        "SELECT month, total_payouts, paid_date FROM payout_runs WHERE month = ?",
    )
    .bind(month)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(month, total_payouts, paid_date)| PayoutRun {
        month,
        total_payouts,
        paid_date,
    }))
}

/// All recorded payout runs, most recent month first
pub async fn list_payout_runs(pool: &SqlitePool) -> Result<Vec<PayoutRun>> {
    let rows = sqlx::query_as::<_, (String, f64, String)>(
        "SELECT month, total_payouts, paid_date FROM payout_runs ORDER BY month DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(month, total_payouts, paid_date)| PayoutRun {
            month,
            total_payouts,
            paid_date,
        })
        .collect())
}

pub async fn insert_payout_run(pool: &SqlitePool, run: &PayoutRun) -> Result<()> {
    sqlx::query("INSERT INTO payout_runs (month, total_payouts, paid_date) VALUES (?, ?, ?)")
        .bind(&run.month)
        .bind(run.total_payouts)
        .bind(&run.paid_date)
        .execute(pool)
        .await?;
    Ok(())
}
