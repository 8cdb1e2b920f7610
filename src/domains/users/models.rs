use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::db::StoreError;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "email is not valid"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    Conflict,

    /// Unknown email on login
    #[error("Invalid email or password.")]
    UserNotFound,

    /// Known email, wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => UserError::Conflict,
            other => UserError::Store(other),
        }
    }
}

impl From<shared::AppError> for UserError {
    fn from(err: shared::AppError) -> Self {
        UserError::Internal(err.to_string())
    }
}

/// Trimmed and lower-cased, the form emails are stored and looked up in.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
