use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::models::{normalize_email, LoginRequest, RegisterRequest, TokenResponse, User, UserError};
use super::repository::UserRepository;
use crate::utils::now_utc;
use shared::AuthService;

const MISSING_FIELDS: &str = "Missing required fields.";

/// Registration and password login. Users are never cached.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, auth: Arc<AuthService>) -> Self {
        Self { repo, auth }
    }

    pub async fn register(&self, mut request: RegisterRequest) -> Result<User, UserError> {
        request.email = normalize_email(&request.email);
        if request.email.is_empty() || request.password.is_empty() || request.name.is_empty() {
            return Err(UserError::Validation(MISSING_FIELDS.to_string()));
        }
        if let Err(errors) = request.validate() {
            return Err(UserError::Validation(errors.to_string()));
        }

        let email = request.email;

        let existing = self.repo.find_by_email(&email).await.map_err(|e| {
            error!(error = %e, "Failed to look up user by email");
            UserError::from(e)
        })?;
        if existing.is_some() {
            info!(email = %email, "Registration for existing email");
            return Err(UserError::Conflict);
        }

        let user = User {
            user_id: Uuid::new_v4().to_string(),
            email,
            name: request.name.trim().to_string(),
            password_hash: self.auth.hash_password(&request.password)?,
            created_at: now_utc(),
        };

        self.repo.insert(&user).await.map_err(|e| {
            warn!(email = %user.email, error = %e, "Failed to insert user");
            UserError::from(e)
        })?;

        info!(user_id = %user.user_id, "User registered");
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, UserError> {
        if request.validate().is_err() {
            return Err(UserError::Validation(MISSING_FIELDS.to_string()));
        }

        let email = normalize_email(&request.email);

        let user = match self.repo.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                info!(email = %email, "Login attempt for non-existent user");
                return Err(UserError::UserNotFound);
            }
            Err(e) => {
                error!(error = %e, "Database error during login");
                return Err(UserError::from(e));
            }
        };

        let matches = self
            .auth
            .verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                error!(user_id = %user.user_id, error = %e, "Stored password hash is unreadable");
                UserError::from(e)
            })?;
        if !matches {
            info!(user_id = %user.user_id, "Invalid password");
            return Err(UserError::InvalidCredentials);
        }

        let token = self.auth.issue_token(&user.user_id, &user.email)?;
        info!(user_id = %user.user_id, "User logged in");
        Ok(TokenResponse { token })
    }
}
