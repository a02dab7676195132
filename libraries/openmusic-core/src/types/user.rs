/// User domain types
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// A registered user (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub fullname: String,
}

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub fullname: String,
}
