//! Cookie-based authentication middleware for the web pages.

use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::middleware::auth::SessionContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::session_token::{clear_session_cookie, token_from_cookies};
use crate::web::handlers::WebError;

/// Authenticates page requests using the `session_token` cookie.
///
/// # Authentication Flow
///
/// 1. Extract `session_token` cookie from request
/// 2. Resolve it via [`crate::domain::auth::AuthProvider::current_user`]
/// 3. On success, insert a [`SessionContext`] and continue to the handler
/// 4. Missing or unknown token: redirect to `/login`
/// 5. Expired session: clear the cookie and redirect to `/login?expired=1`
///
/// Unlike the API middleware, which answers `401`, this one redirects so the
/// browser lands on the login form.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let Some(token) = token_from_cookies(&parts.headers) else {
        return Redirect::to("/login").into_response();
    };

    match st.auth.current_user(&token).await {
        Ok(user) => {
            parts.extensions.insert(SessionContext { user, token });
            next.run(Request::from_parts(parts, body)).await
        }
        Err(AppError::Unauthorized { .. }) => (
            [(SET_COOKIE, clear_session_cookie())],
            Redirect::to("/login"),
        )
            .into_response(),
        Err(e) => WebError(e).into_response(),
    }
}
