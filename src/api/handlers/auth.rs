//! Handlers for login, logout and the current session.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse};
use crate::api::middleware::auth::SessionContext;
use crate::domain::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::session_token::{clear_session_cookie, session_cookie};

/// Opens a session.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Response
///
/// The token in the body for `Authorization: Bearer` use, plus the same token
/// as an `HttpOnly` session cookie.
///
/// # Errors
///
/// - `400` for a malformed email or empty password
/// - `401` for unknown email or wrong password (indistinguishable)
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = state
        .auth
        .login(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| {
            AppError::unauthorized(
                "Invalid email or password",
                json!({ "reason": "invalid_credentials" }),
            )
        })?;

    let cookie = session_cookie(
        &session.token,
        state.session.ttl_seconds,
        state.session.secure_cookies,
    );

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(LoginResponse::from(session)),
    ))
}

/// Ends the current session and drops its reorder drafts.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.logout(&ctx.token).await?;
    state
        .reorder_service
        .discard_session(ctx.user.session_id)
        .await;

    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, clear_session_cookie())]))
}

/// Returns the signed-in administrator.
///
/// # Endpoint
///
/// `GET /api/auth/me`
pub async fn me_handler(Extension(ctx): Extension<SessionContext>) -> Json<AuthenticatedUser> {
    Json(ctx.user)
}
