/// Account registration shared by `POST /users` and the `add-user` command
use crate::{error::Result, services::AuthService};
use openmusic_core::{NewUser, PayloadKind, SchemaRegistry, User};
use openmusic_storage::{users, Database};
use serde_json::Value;

/// Validate a registration payload, hash the password and store the user
pub async fn register(
    db: &Database,
    auth_service: &AuthService,
    schemas: &SchemaRegistry,
    payload: Value,
) -> Result<User> {
    let new_user: NewUser = schemas.parse(PayloadKind::NewUser, payload)?;

    let password_hash = auth_service.hash_password(&new_user.password)?;
    let user = users::create(
        db.pool(),
        &new_user.username,
        &new_user.fullname,
        &password_hash,
    )
    .await?;

    tracing::info!("Registered user {}", user.username);
    Ok(user)
}
