//! Artist identity settings

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use releasio_common::db::queries;
use releasio_common::Error;

use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtistSettings {
    pub name: String,
}

/// GET /api/settings/artist
pub async fn get_artist(
    State(state): State<AppState>,
) -> Result<Json<ArtistSettings>, ApiError> {
    let name = queries::artist_name(&state.db).await?;
    Ok(Json(ArtistSettings { name }))
}

/// PUT /api/settings/artist
pub async fn set_artist(
    State(state): State<AppState>,
    Json(request): Json<ArtistSettings>,
) -> Result<Json<ArtistSettings>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(Error::InvalidInput("Artist name must not be empty".to_string()).into());
    }

    queries::set_setting(&state.db, "artist_name", &request.name).await?;
    Ok(Json(request))
}
