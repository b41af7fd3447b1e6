//! Handlers for printable documents.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::application::services::PrintableDocument;
use crate::domain::document::{DocumentKind, DocumentTree};
use crate::error::AppError;
use crate::state::AppState;

/// Output options for document endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    /// `json` returns the assembled tree instead of the rendered file.
    pub format: Option<String>,
    /// Sends the file as an attachment instead of inline.
    #[serde(default)]
    pub download: bool,
}

fn respond(
    state: &AppState,
    tree: DocumentTree,
    query: &DocumentQuery,
) -> Result<Response, AppError> {
    if query.format.as_deref() == Some("json") {
        return Ok(Json(tree).into_response());
    }

    let PrintableDocument {
        filename,
        content_type,
        body,
    } = state.document_service.render(&tree)?;

    let disposition = if query.download { "attachment" } else { "inline" };

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("{disposition}; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Resident directory or mailbox labels for a building.
///
/// # Endpoint
///
/// `GET /api/buildings/{id}/documents/{directory|labels}?format=json&download=true`
///
/// # Errors
///
/// - `404` for an unknown building or document kind
/// - `500 render_error` if rendering fails; the request can simply be repeated
pub async fn document_handler(
    State(state): State<AppState>,
    Path((building_id, kind)): Path<(i64, String)>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, AppError> {
    let kind = DocumentKind::from_path(&kind).ok_or_else(|| {
        AppError::not_found("Unknown document", json!({ "document": kind }))
    })?;

    let tree = state.document_service.assemble(building_id, kind).await?;
    respond(&state, tree, &query)
}

/// Mailbox label for a single apartment.
///
/// # Endpoint
///
/// `GET /api/buildings/{id}/apartments/{apt}/label`
pub async fn apartment_label_handler(
    State(state): State<AppState>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, AppError> {
    let tree = state
        .document_service
        .apartment_label(building_id, &apartment_number)
        .await?;
    respond(&state, tree, &query)
}
