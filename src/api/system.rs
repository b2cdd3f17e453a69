use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::SystemStatus;
use super::{ApiError, ApiResponse, AppState};

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let database_ok = state.shared.store.ping().await.is_ok();

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        database_ok,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })))
}
