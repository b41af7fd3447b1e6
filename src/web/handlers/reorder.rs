//! Reorder page for the residents of one apartment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::api::middleware::auth::SessionContext;
use crate::domain::entities::Building;
use crate::domain::reorder::ReorderState;
use crate::error::AppError;
use crate::infrastructure::drafts::DraftKey;
use crate::state::AppState;
use crate::web::handlers::{FlashQuery, WebError, path_segment, redirect_on_error, redirect_with};

struct ReorderRow {
    position: usize,
    name: String,
    priority: String,
    up_to: Option<usize>,
    down_to: Option<usize>,
}

/// Template for the reorder page.
///
/// Renders `templates/reorder.html`. While editing, each resident has
/// move-up/move-down buttons; the position shown is the priority that will be
/// saved.
#[derive(Template, WebTemplate)]
#[template(path = "reorder.html")]
struct ReorderTemplate {
    building: Building,
    apartment_number: String,
    base_path: String,
    editing: bool,
    dirty: bool,
    rows: Vec<ReorderRow>,
    last_error: Option<String>,
    error: Option<String>,
    read_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct MoveForm {
    pub from: usize,
    pub to: usize,
}

fn reorder_path(building_id: i64, apartment_number: &str) -> String {
    format!(
        "/buildings/{building_id}/apartments/{}/reorder",
        path_segment(apartment_number)
    )
}

fn draft_key(ctx: &SessionContext, building_id: i64, apartment_number: &str) -> DraftKey {
    DraftKey::new(ctx.user.session_id, building_id, apartment_number)
}

/// `GET /buildings/{id}/apartments/{apt}/reorder`
pub async fn reorder_page_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
    Query(flash): Query<FlashQuery>,
) -> Result<Response, WebError> {
    let building = state.building_service.get_building(building_id).await?;
    let snapshot = state
        .reorder_service
        .view(&draft_key(&ctx, building_id, &apartment_number))
        .await?;

    let editing = snapshot.state != ReorderState::Viewing;
    let last = snapshot.residents.len().saturating_sub(1);
    let rows = snapshot
        .residents
        .iter()
        .enumerate()
        .map(|(position, resident)| ReorderRow {
            position: position + 1,
            name: resident.name.clone(),
            priority: resident.priority.map(|p| p.to_string()).unwrap_or_default(),
            up_to: position.checked_sub(1),
            down_to: (position < last).then_some(position + 1),
        })
        .collect();

    Ok(ReorderTemplate {
        base_path: reorder_path(building_id, &apartment_number),
        building,
        apartment_number,
        editing,
        dirty: snapshot.dirty,
        rows,
        last_error: snapshot.last_error,
        error: flash.error,
        read_only: state.read_only,
    }
    .into_response())
}

/// `POST /buildings/{id}/apartments/{apt}/reorder/start`
pub async fn reorder_start_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Response {
    let path = reorder_path(building_id, &apartment_number);
    let key = draft_key(&ctx, building_id, &apartment_number);

    match state.reorder_service.begin_editing(&key).await {
        Ok(_) => Redirect::to(&path).into_response(),
        Err(e) => redirect_on_error(&path, e),
    }
}

/// `POST /buildings/{id}/apartments/{apt}/reorder/move`
pub async fn reorder_move_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
    Form(form): Form<MoveForm>,
) -> Response {
    let path = reorder_path(building_id, &apartment_number);
    let key = draft_key(&ctx, building_id, &apartment_number);

    match state
        .reorder_service
        .move_resident(&key, form.from, form.to)
        .await
    {
        Ok(_) => Redirect::to(&path).into_response(),
        Err(e) => redirect_on_error(&path, e),
    }
}

/// `POST /buildings/{id}/apartments/{apt}/reorder/save`
///
/// On failure the working copy stays in editing with the error shown on the
/// page, so saving can simply be retried.
pub async fn reorder_save_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Response {
    let path = reorder_path(building_id, &apartment_number);
    let key = draft_key(&ctx, building_id, &apartment_number);

    match state.reorder_service.save(&key).await {
        Ok(_) => redirect_with(
            &format!("/buildings/{building_id}"),
            "notice",
            "Röðun var vistuð.",
        )
        .into_response(),
        Err(e @ (AppError::PartialSave { .. } | AppError::DataAccess { .. })) => {
            tracing::warn!(building_id, apartment = %apartment_number, error = %e, "Reorder save failed");
            Redirect::to(&path).into_response()
        }
        Err(e) => redirect_on_error(&path, e),
    }
}

/// `POST /buildings/{id}/apartments/{apt}/reorder/cancel`
pub async fn reorder_cancel_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
) -> Response {
    let key = draft_key(&ctx, building_id, &apartment_number);

    match state.reorder_service.cancel(&key).await {
        Ok(_) => Redirect::to(&format!("/buildings/{building_id}")).into_response(),
        Err(e) => redirect_on_error(&reorder_path(building_id, &apartment_number), e),
    }
}
