//! Login and logout pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::state::AppState;
use crate::utils::session_token::{clear_session_cookie, session_cookie, token_from_cookies};
use crate::web::handlers::WebError;

/// Template for the login page.
///
/// Renders `templates/login.html` with the email/password form and, when set,
/// an error or "session expired" banner.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    email: String,
    error: Option<String>,
    expired: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub expired: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login`, `GET /login?expired=1` after a session ran out.
pub async fn login_form_handler(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        email: String::new(),
        error: None,
        expired: query.expired.is_some(),
    }
}

/// Checks credentials and opens a browser session.
///
/// # Endpoint
///
/// `POST /login`
///
/// On success the session cookie is set and the browser is sent to
/// `/buildings`; on failure the form is shown again with the email kept.
pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let Some(session) = state.auth.login(&form.email, &form.password).await? else {
        let page = LoginTemplate {
            email: form.email,
            error: Some("Rangt netfang eða lykilorð.".to_string()),
            expired: false,
        };
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    };

    let cookie = session_cookie(
        &session.token,
        state.session.ttl_seconds,
        state.session.secure_cookies,
    );
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/buildings")).into_response())
}

/// Ends the browser session.
///
/// # Endpoint
///
/// `POST /logout`
///
/// Works with a missing or already expired session; the cookie is always
/// cleared.
pub async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_cookies(&headers) {
        if let Ok(user) = state.auth.current_user(&token).await {
            state.reorder_service.discard_session(user.session_id).await;
        }
        if let Err(e) = state.auth.logout(&token).await {
            tracing::warn!(error = %e, "Logout failed");
        }
    }

    ([(SET_COOKIE, clear_session_cookie())], Redirect::to("/login")).into_response()
}
