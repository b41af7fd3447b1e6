//! Handlers for resident management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::resident::{
    ApartmentItem, ApartmentListResponse, BatchIntakeRequest, CreateResidentRequest,
    ResidentItem, ResidentListQuery, ResidentListResponse, UpdateResidentRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the residents of a building.
///
/// # Endpoint
///
/// `GET /api/buildings/{id}/residents?sort=name`
///
/// Without `sort=name` residents are returned in store order.
pub async fn resident_list_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Query(query): Query<ResidentListQuery>,
) -> Result<Json<ResidentListResponse>, AppError> {
    let residents = if query.sort.as_deref() == Some("name") {
        state.resident_service.list_by_name(building_id).await?
    } else {
        state.resident_service.list_residents(building_id).await?
    };

    Ok(Json(ResidentListResponse {
        items: residents.into_iter().map(ResidentItem::from).collect(),
    }))
}

/// Lists apartments in numeric order with residents in priority order.
///
/// # Endpoint
///
/// `GET /api/buildings/{id}/apartments`
pub async fn apartment_list_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
) -> Result<Json<ApartmentListResponse>, AppError> {
    let apartments = state.resident_service.list_apartments(building_id).await?;

    Ok(Json(ApartmentListResponse {
        items: apartments.into_iter().map(ApartmentItem::from).collect(),
    }))
}

/// Registers one resident.
///
/// # Endpoint
///
/// `POST /api/buildings/{id}/residents`
///
/// # Request Body
///
/// ```json
/// { "name": "Guðrún Jónsdóttir", "apartment_number": "101", "priority": 0 }
/// ```
///
/// # Errors
///
/// - `400` if name or apartment number is blank, or the name is already
///   registered in the apartment
/// - `403` if the record store is read-only
/// - `404` if the building does not exist
pub async fn create_resident_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Json(payload): Json<CreateResidentRequest>,
) -> Result<(StatusCode, Json<ResidentItem>), AppError> {
    payload.validate()?;

    let resident = state
        .resident_service
        .create_resident(payload.into_new_resident(building_id)?)
        .await?;

    Ok((StatusCode::CREATED, Json(resident.into())))
}

/// Registers residents for several apartments at once, all-or-nothing.
///
/// # Endpoint
///
/// `POST /api/buildings/{id}/residents/batch`
///
/// # Request Body
///
/// ```json
/// {
///   "apartments": [
///     { "apartment_number": "101", "names": ["Anna", "Jón"] },
///     { "apartment_number": "102", "names": ["Þóra"] }
///   ]
/// }
/// ```
///
/// # Errors
///
/// `400` lists every problem in `details.errors`; nothing is stored.
pub async fn batch_create_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Json(payload): Json<BatchIntakeRequest>,
) -> Result<(StatusCode, Json<ResidentListResponse>), AppError> {
    payload.validate()?;

    let created = state
        .resident_service
        .create_batch(building_id, payload.into_intake())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ResidentListResponse {
            items: created.into_iter().map(ResidentItem::from).collect(),
        }),
    ))
}

/// Partially updates a resident.
///
/// # Endpoint
///
/// `PATCH /api/residents/{id}`
///
/// Absent fields are unchanged; `null` clears `priority` or
/// `exclude_from_directory`.
pub async fn update_resident_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateResidentRequest>,
) -> Result<Json<ResidentItem>, AppError> {
    payload.validate()?;

    let resident = state
        .resident_service
        .update_resident(id, payload.into_patch()?)
        .await?;

    Ok(Json(resident.into()))
}

/// Deletes a resident.
///
/// # Endpoint
///
/// `DELETE /api/residents/{id}`
pub async fn delete_resident_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.resident_service.delete_resident(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
