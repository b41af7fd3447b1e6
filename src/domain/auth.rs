//! Authentication capability handed to the API and web layers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;

/// The administrator behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    #[serde(skip)]
    pub session_id: i64,
}

/// Result of a successful login. `token` is shown once and never stored.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub user: AuthenticatedUser,
    pub expires_at: DateTime<Utc>,
}

/// Login, logout and session checks.
///
/// Every data route sits behind [`AuthProvider::current_user`]; nothing is
/// fetched for a request that fails it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns `None` for an unknown email or a wrong password.
    async fn login(&self, email: &str, password: &str) -> Result<Option<LoginSession>, AppError>;

    /// Ends the session. Unknown tokens are ignored.
    async fn logout(&self, token: &str) -> Result<(), AppError>;

    /// Resolves a session token.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for unknown tokens
    /// - [`AppError::SessionExpired`] for sessions past their expiry
    async fn current_user(&self, token: &str) -> Result<AuthenticatedUser, AppError>;

    async fn is_authenticated(&self, token: &str) -> bool {
        self.current_user(token).await.is_ok()
    }
}
