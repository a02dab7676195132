/// User registration API routes
use crate::{api::ApiResponse, error::Result, services::accounts, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use openmusic_core::UserId;
use openmusic_storage::users;
use serde_json::{json, Value};

/// POST /users
pub async fn register_user(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let user = accounts::register(
        &app_state.db,
        &app_state.auth_service,
        &app_state.schemas,
        payload,
    )
    .await?;

    Ok(ApiResponse::created(json!({ "userId": user.id })))
}

/// GET /users/:id
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<ApiResponse> {
    let user = users::get_by_id(app_state.db.pool(), &id).await?;

    Ok(ApiResponse::ok(json!({ "user": user })))
}
