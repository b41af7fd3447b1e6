//! HTML page handlers.
//!
//! Form posts follow post/redirect/get: success and validation messages travel
//! back to the page in `notice` / `error` query parameters.

mod buildings;
mod login;
mod print;
mod reorder;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::utils::session_token::clear_session_cookie;

pub use buildings::{
    add_resident_handler, building_handler, buildings_handler, delete_resident_handler,
    edit_resident_handler, intake_handler,
};
pub use login::{login_form_handler, login_handler, logout_handler};
pub use print::{apartment_label_print_handler, print_handler};
pub use reorder::{
    reorder_cancel_handler, reorder_move_handler, reorder_page_handler, reorder_save_handler,
    reorder_start_handler,
};

/// Messages carried across a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Generic error page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

/// An [`AppError`] answered with an HTML page instead of JSON.
///
/// Expired sessions are the exception: they clear the cookie and send the
/// browser to `/login?expired=1`.
#[derive(Debug)]
pub struct WebError(pub AppError);

impl From<AppError> for WebError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let error = self.0;

        match error {
            AppError::SessionExpired { .. } => (
                [(SET_COOKIE, clear_session_cookie())],
                Redirect::to("/login?expired=1"),
            )
                .into_response(),
            AppError::Unauthorized { .. } => Redirect::to("/login").into_response(),
            _ => {
                let status = error.status();
                if status.is_server_error() {
                    tracing::error!(code = error.code(), error = %error, "Page request failed");
                }
                (
                    status,
                    ErrorTemplate {
                        status: status.as_u16(),
                        message: error.user_message(),
                    },
                )
                    .into_response()
            }
        }
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Percent-encodes one URL path segment.
pub(crate) fn path_segment(value: &str) -> String {
    encode(value).replace('+', "%20")
}

/// `303 See Other` to `path` with a message in the query string.
pub(crate) fn redirect_with(path: &str, key: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?{key}={}", encode(message)))
}

/// Redirects back with the error's message, or renders it when the page
/// itself can't be shown (session expired, store unreachable).
pub(crate) fn redirect_on_error(path: &str, error: AppError) -> Response {
    match error {
        AppError::Validation { .. } | AppError::Conflict { .. } | AppError::Forbidden { .. } => {
            redirect_with(path, "error", &error.user_message()).into_response()
        }
        other => WebError(other).into_response(),
    }
}
