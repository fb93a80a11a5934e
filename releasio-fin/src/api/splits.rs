//! Master split editing
//!
//! The one place split percentages are validated: the aggregator trusts
//! stored splits, so nothing invalid may be saved here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use releasio_common::catalog::{self, MasterSplit};
use releasio_common::db::queries;
use releasio_common::Error;

use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSplitsRequest {
    pub splits: Vec<MasterSplit>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSplitsResponse {
    pub status: String,
    pub splits: Vec<MasterSplit>,
}

/// PUT /api/releases/:id/splits
///
/// Replace a release's master splits wholesale. Rejected unless every
/// percentage is within 0-100, no collaborator repeats, the total stays
/// at or under 100, and every referenced collaborator exists.
pub async fn update_splits(
    State(state): State<AppState>,
    Path(release_id): Path<Uuid>,
    Json(request): Json<UpdateSplitsRequest>,
) -> Result<Json<UpdateSplitsResponse>, ApiError> {
    if !queries::release_exists(&state.db, release_id).await? {
        return Err(Error::NotFound(format!("Release {} not found", release_id)).into());
    }

    catalog::validate_splits(&request.splits)?;

    let known = queries::list_collaborator_ids(&state.db).await?;
    for split in &request.splits {
        if !known.contains(&split.collaborator_id) {
            return Err(Error::InvalidInput(format!(
                "Unknown collaborator {}",
                split.collaborator_id
            ))
            .into());
        }
    }

    queries::replace_master_splits(&state.db, release_id, &request.splits).await?;

    Ok(Json(UpdateSplitsResponse {
        status: "ok".to_string(),
        splits: request.splits,
    }))
}
