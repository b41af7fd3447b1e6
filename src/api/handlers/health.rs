//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: The record store is unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "record_store": { "status": "ok", "message": "3 buildings" },
///     "reorder_drafts": { "status": "ok", "message": "0 in progress" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_record_store(&state).await;
    let drafts_check = CheckStatus {
        status: "ok".to_string(),
        message: Some(format!("{} in progress", state.drafts.len().await)),
    };

    let all_healthy = store_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            record_store: store_check,
            reorder_drafts: drafts_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_record_store(state: &AppState) -> CheckStatus {
    match state.building_service.list_buildings().await {
        Ok(buildings) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{} buildings", buildings.len())),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Record store error: {}", e.message())),
        },
    }
}
