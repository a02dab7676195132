/// Authentication API routes
use crate::{api::ApiResponse, error::Result, state::AppState};
use axum::{extract::State, Json};
use openmusic_core::{Fault, PayloadKind};
use openmusic_storage::{authentications, users};
use serde::Deserialize;
use serde_json::{json, Value};

/// Same message for unknown users and wrong passwords
pub const INVALID_CREDENTIALS: &str = "The credentials you provided are incorrect";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /authentications
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: LoginRequest = app_state.schemas.parse(PayloadKind::Login, payload)?;

    let credentials = users::find_credentials(app_state.db.pool(), &req.username)
        .await?
        .ok_or_else(|| Fault::unauthorized(INVALID_CREDENTIALS))?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &credentials.password_hash)?
    {
        return Err(Fault::unauthorized(INVALID_CREDENTIALS).into());
    }

    let access_token = app_state
        .auth_service
        .create_access_token(&credentials.user_id)?;
    let refresh_token = app_state
        .auth_service
        .create_refresh_token(&credentials.user_id)?;
    authentications::add(app_state.db.pool(), &refresh_token).await?;

    Ok(ApiResponse::created(json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
    })))
}

/// PUT /authentications
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: RefreshRequest = app_state.schemas.parse(PayloadKind::RefreshToken, payload)?;

    authentications::verify(app_state.db.pool(), &req.refresh_token).await?;
    let user_id = app_state
        .auth_service
        .verify_refresh_token(&req.refresh_token)?;
    let access_token = app_state.auth_service.create_access_token(&user_id)?;

    Ok(ApiResponse::ok(json!({ "accessToken": access_token })))
}

/// DELETE /authentications
pub async fn logout(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<ApiResponse> {
    let req: RefreshRequest = app_state.schemas.parse(PayloadKind::RefreshToken, payload)?;

    authentications::verify(app_state.db.pool(), &req.refresh_token).await?;
    authentications::delete(app_state.db.pool(), &req.refresh_token).await?;

    Ok(ApiResponse::message("Refresh token deleted"))
}
