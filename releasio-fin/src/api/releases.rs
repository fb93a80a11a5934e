//! Release catalog endpoints: listing, creation, royalty ingestion

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use releasio_common::catalog::{self, Release, RoyaltyEntry};
use releasio_common::db::queries;
use releasio_common::Error;

use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReleaseRequest {
    pub artist: String,
    pub title: String,
    pub release_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AppendRoyaltiesRequest {
    pub entries: Vec<RoyaltyEntry>,
}

#[derive(Debug, Serialize)]
pub struct AppendRoyaltiesResponse {
    pub status: String,
    pub appended: usize,
}

/// GET /api/releases
///
/// The full catalog with splits and royalty entries attached.
pub async fn list_releases(
    State(state): State<AppState>,
) -> Result<Json<Vec<Release>>, ApiError> {
    Ok(Json(queries::load_releases(&state.db).await?))
}

/// POST /api/releases
pub async fn create_release(
    State(state): State<AppState>,
    Json(request): Json<CreateReleaseRequest>,
) -> Result<Json<Release>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(Error::InvalidInput("Release title must not be empty".to_string()).into());
    }
    if request.artist.trim().is_empty() {
        return Err(Error::InvalidInput("Release artist must not be empty".to_string()).into());
    }

    let release = Release {
        id: Uuid::new_v4(),
        artist: request.artist,
        title: request.title,
        release_date: request.release_date,
        master_splits: Vec::new(),
        royalty_data: Vec::new(),
    };
    queries::insert_release(&state.db, &release).await?;

    Ok(Json(release))
}

/// POST /api/releases/:id/royalties
///
/// Append royalty entries to a release. Month keys are validated here at
/// the editing edge; entries are appended without deduplication, so a
/// repeated month accumulates into that month's total.
pub async fn append_royalties(
    State(state): State<AppState>,
    Path(release_id): Path<Uuid>,
    Json(request): Json<AppendRoyaltiesRequest>,
) -> Result<Json<AppendRoyaltiesResponse>, ApiError> {
    if request.entries.is_empty() {
        return Err(Error::InvalidInput("No royalty entries supplied".to_string()).into());
    }
    for entry in &request.entries {
        if !catalog::is_valid_month_key(&entry.month) {
            return Err(Error::InvalidInput(format!(
                "Invalid month key {:?} (expected YYYY-MM)",
                entry.month
            ))
            .into());
        }
    }

    if !queries::release_exists(&state.db, release_id).await? {
        return Err(Error::NotFound(format!("Release {} not found", release_id)).into());
    }

    queries::append_royalty_entries(&state.db, release_id, &request.entries).await?;

    Ok(Json(AppendRoyaltiesResponse {
        status: "ok".to_string(),
        appended: request.entries.len(),
    }))
}
