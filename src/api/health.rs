use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::warn;

use super::common::ResponseMsg;
use crate::db::check_health;
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<ResponseMsg> {
    ResponseMsg::new("Blog API is running!")
}

/// GET /health
///
/// The database is required; the cache is not. A cache outage reports
/// `degraded` with 200, a database outage reports `unhealthy` with 503.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database_ok = check_health(&state.db_pool).await;

    let cache = if !state.cache_enabled {
        "disabled"
    } else {
        match state.blog_service.cache().store().ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                warn!(error = %e, "Cache health check failed");
                "unhealthy"
            }
        }
    };

    let (status_code, status) = if !database_ok {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if cache == "unhealthy" {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "healthy")
    };

    let body = serde_json::json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "database": if database_ok { "healthy" } else { "unhealthy" },
        "cache": cache,
    });

    (status_code, Json(body))
}
