//! Collaborator catalog endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use releasio_common::catalog::{Collaborator, CollaboratorRole};
use releasio_common::db::queries;
use releasio_common::Error;

use crate::api::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCollaboratorRequest {
    pub name: String,
    pub role: CollaboratorRole,
    pub email: String,
}

/// GET /api/collaborators
pub async fn list_collaborators(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collaborator>>, ApiError> {
    Ok(Json(queries::list_collaborators(&state.db).await?))
}

/// POST /api/collaborators
pub async fn create_collaborator(
    State(state): State<AppState>,
    Json(request): Json<CreateCollaboratorRequest>,
) -> Result<Json<Collaborator>, ApiError> {
    if request.name.trim().is_empty() {
        return Err(Error::InvalidInput("Collaborator name must not be empty".to_string()).into());
    }

    let collaborator = Collaborator {
        id: Uuid::new_v4(),
        name: request.name,
        role: request.role,
        email: request.email,
    };
    queries::insert_collaborator(&state.db, &collaborator).await?;

    Ok(Json(collaborator))
}
