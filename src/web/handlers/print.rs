//! Printable documents opened from the resident manager.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::document::{DocumentKind, DocumentTree};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::{WebError, path_segment};

/// Shown instead of the document when rendering fails.
#[derive(Template, WebTemplate)]
#[template(path = "print_error.html")]
struct PrintErrorTemplate {
    title: String,
    message: String,
    retry_url: String,
    back_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrintQuery {
    #[serde(default)]
    pub download: bool,
}

fn printable(
    state: &AppState,
    tree: &DocumentTree,
    building_id: i64,
    retry_url: String,
    download: bool,
) -> Response {
    match state.document_service.render(tree) {
        Ok(document) => {
            let disposition = if download { "attachment" } else { "inline" };
            (
                [
                    (CONTENT_TYPE, document.content_type.to_string()),
                    (
                        CONTENT_DISPOSITION,
                        format!("{disposition}; filename=\"{}\"", document.filename),
                    ),
                ],
                document.body,
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            PrintErrorTemplate {
                title: tree.title.clone(),
                message: e.user_message(),
                retry_url,
                back_url: format!("/buildings/{building_id}"),
            },
        )
            .into_response(),
    }
}

/// `GET /buildings/{id}/print/{directory|labels}`
pub async fn print_handler(
    State(state): State<AppState>,
    Path((building_id, kind)): Path<(i64, String)>,
    Query(query): Query<PrintQuery>,
) -> Result<Response, WebError> {
    let document_kind = DocumentKind::from_path(&kind).ok_or_else(|| {
        AppError::not_found("Unknown document", json!({ "document": kind }))
    })?;

    let tree = state
        .document_service
        .assemble(building_id, document_kind)
        .await?;

    Ok(printable(
        &state,
        &tree,
        building_id,
        format!("/buildings/{building_id}/print/{kind}"),
        query.download,
    ))
}

/// `GET /buildings/{id}/print/apartments/{apt}`
pub async fn apartment_label_print_handler(
    State(state): State<AppState>,
    Path((building_id, apartment_number)): Path<(i64, String)>,
    Query(query): Query<PrintQuery>,
) -> Result<Response, WebError> {
    let tree = state
        .document_service
        .apartment_label(building_id, &apartment_number)
        .await?;

    Ok(printable(
        &state,
        &tree,
        building_id,
        format!(
            "/buildings/{building_id}/print/apartments/{}",
            path_segment(&apartment_number)
        ),
        query.download,
    ))
}
