/// Playlist export API route
use crate::{
    api::ApiResponse, error::Result, jobs::ExportJob, middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use openmusic_core::{PayloadKind, PlaylistId};
use openmusic_storage::playlists;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub target_email: String,
}

/// POST /export/playlists/:playlist_id - owner only, processed in the background
pub async fn export_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(playlist_id): Path<PlaylistId>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: ExportRequest = app_state.schemas.parse(PayloadKind::Export, payload)?;

    playlists::verify_owner(app_state.db.pool(), &playlist_id, auth.user_id()).await?;

    app_state
        .export_queue
        .enqueue(ExportJob {
            playlist_id,
            target_email: req.target_email,
        })
        .await?;

    Ok(ApiResponse::created_message("Your request is being processed"))
}
