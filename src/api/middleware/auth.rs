//! Session authentication middleware for the JSON API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::utils::session_token::token_from_cookies;
use crate::{error::AppError, state::AppState};

/// The authenticated administrator, added to request extensions by [`layer`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: AuthenticatedUser,
    pub token: String,
}

/// Authenticates API requests with a session token.
///
/// # Token Sources
///
/// ```text
/// Authorization: Bearer <token>
/// Cookie: session_token=<token>
/// ```
///
/// The header wins when both are present. On success a [`SessionContext`] is
/// inserted into the request extensions.
///
/// # Errors
///
/// - `401 unauthorized` if no token is sent or the token is unknown
/// - `401 session_expired` if the session has expired
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => Some(token),
        Err(_) => token_from_cookies(&parts.headers),
    }
    .ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Session token is missing"}),
        )
    })?;

    let user = st.auth.current_user(&token).await?;
    parts.extensions.insert(SessionContext { user, token });

    Ok(next.run(Request::from_parts(parts, body)).await)
}
