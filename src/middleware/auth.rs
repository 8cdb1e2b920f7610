use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::state::AppState;
use shared::AppError;

/// Authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
}

/// Require `Authorization: Bearer <jwt>` and expose the caller as [`CurrentUser`].
///
/// Every failure answers 401 `{"message": "Unauthorized"}`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            AppError::authentication("Missing Authorization header")
        })?;

    let token = state.auth.extract_token_from_header(auth_header)?;

    let context = state.auth.extract_user_context(token).map_err(|e| {
        warn!(error = %e, "JWT validation failed");
        e
    })?;

    request.extensions_mut().insert(CurrentUser {
        user_id: context.user_id,
        email: context.email,
    });

    Ok(next.run(request).await)
}
