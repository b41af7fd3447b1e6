//! Handler for listing buildings.

use axum::{Json, extract::State};

use crate::api::dto::building::{BuildingItem, BuildingListResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists buildings ordered by title.
///
/// # Endpoint
///
/// `GET /api/buildings`
pub async fn building_list_handler(
    State(state): State<AppState>,
) -> Result<Json<BuildingListResponse>, AppError> {
    let buildings = state.building_service.list_buildings().await?;

    Ok(Json(BuildingListResponse {
        items: buildings.into_iter().map(BuildingItem::from).collect(),
        read_only: state.read_only,
    }))
}
