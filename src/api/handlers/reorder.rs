//! Handlers for reordering the residents of one apartment.
//!
//! Each login session has its own working copy per apartment. The flow is
//! `POST .../reorder` (start editing), any number of `POST .../reorder/moves`,
//! then `POST .../reorder/save` or `DELETE .../reorder` to cancel.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::reorder::{MoveRequest, ReorderResponse};
use crate::api::middleware::auth::SessionContext;
use crate::error::AppError;
use crate::infrastructure::drafts::DraftKey;
use crate::state::AppState;

fn draft_key(ctx: &SessionContext, building_id: i64, apartment_number: String) -> DraftKey {
    DraftKey::new(ctx.user.session_id, building_id, apartment_number)
}

/// `GET /api/buildings/{id}/apartments/{apt}/reorder`
///
/// The working copy while editing, the persisted order otherwise.
pub async fn get_reorder_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Result<Json<ReorderResponse>, AppError> {
    let key = draft_key(&ctx, building_id, apartment_number);
    Ok(Json(state.reorder_service.view(&key).await?.into()))
}

/// `POST /api/buildings/{id}/apartments/{apt}/reorder`
///
/// # Errors
///
/// `409` if this session is already reordering the apartment.
pub async fn begin_reorder_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Result<Json<ReorderResponse>, AppError> {
    let key = draft_key(&ctx, building_id, apartment_number);
    Ok(Json(state.reorder_service.begin_editing(&key).await?.into()))
}

/// `POST /api/buildings/{id}/apartments/{apt}/reorder/moves`
///
/// # Request Body
///
/// ```json
/// { "from": 2, "to": 0 }
/// ```
///
/// # Errors
///
/// - `400` if either index is out of range
/// - `409` if no reorder is in progress
pub async fn move_resident_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
    Json(payload): Json<MoveRequest>,
) -> Result<Json<ReorderResponse>, AppError> {
    let key = draft_key(&ctx, building_id, apartment_number);
    let snapshot = state
        .reorder_service
        .move_resident(&key, payload.from, payload.to)
        .await?;
    Ok(Json(snapshot.into()))
}

/// `POST /api/buildings/{id}/apartments/{apt}/reorder/save`
///
/// # Errors
///
/// - `409` if the apartment's residents changed since editing began
/// - `502 partial_save` if only some priorities were written;
///   `details.failed` lists the residents to retry
/// - `502 data_access_error` if nothing was written
///
/// After a failure the working copy is kept and the save can be retried.
pub async fn save_reorder_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Result<Json<ReorderResponse>, AppError> {
    let key = draft_key(&ctx, building_id, apartment_number);
    Ok(Json(state.reorder_service.save(&key).await?.into()))
}

/// `DELETE /api/buildings/{id}/apartments/{apt}/reorder`
///
/// Discards the working copy and returns the persisted order.
pub async fn cancel_reorder_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Result<Json<ReorderResponse>, AppError> {
    let key = draft_key(&ctx, building_id, apartment_number);
    Ok(Json(state.reorder_service.cancel(&key).await?.into()))
}
