/// Collaboration API routes - playlist owners only
use crate::{
    api::ApiResponse, error::Result, middleware::AuthenticatedUser, state::AppState,
};
use axum::{extract::State, Json};
use openmusic_core::{PayloadKind, PlaylistId, UserId};
use openmusic_storage::{collaborations, playlists};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    pub playlist_id: PlaylistId,
    pub user_id: UserId,
}

/// POST /collaborations
pub async fn add_collaborator(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: CollaborationRequest =
        app_state.schemas.parse(PayloadKind::Collaboration, payload)?;

    let pool = app_state.db.pool();
    playlists::verify_owner(pool, &req.playlist_id, auth.user_id()).await?;
    let collaboration_id = collaborations::add(pool, &req.playlist_id, &req.user_id).await?;

    Ok(ApiResponse::created(json!({ "collaborationId": collaboration_id })))
}

/// DELETE /collaborations
pub async fn remove_collaborator(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: CollaborationRequest =
        app_state.schemas.parse(PayloadKind::Collaboration, payload)?;

    let pool = app_state.db.pool();
    playlists::verify_owner(pool, &req.playlist_id, auth.user_id()).await?;
    collaborations::remove(pool, &req.playlist_id, &req.user_id).await?;

    Ok(ApiResponse::message("Collaboration removed"))
}
