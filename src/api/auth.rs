use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use super::common::{ApiError, ResponseData, ResponseMsg};
use crate::domains::users::{LoginRequest, RegisterRequest, TokenResponse};
use crate::state::AppState;

/// POST /api/v1/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<ResponseMsg>, ApiError> {
    let Json(request) = body?;
    state.user_service.register(request).await?;
    Ok(ResponseMsg::new("Create user successfully."))
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ResponseData<TokenResponse>>, ApiError> {
    let Json(request) = body?;
    let token = state.user_service.login(request).await?;
    Ok(ResponseData::new("Login successfully.", token))
}
