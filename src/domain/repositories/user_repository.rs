//! Repository traits for administrator accounts and login sessions.

use crate::domain::entities::{NewSession, Session, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for administrator accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by (lowercased) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Creates a user with an already hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    /// Lists all users.
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

/// Repository interface for login sessions.
///
/// Sessions are looked up by the HMAC of their token, never the raw token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session.
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError>;

    /// Finds a session by token hash, expired or not.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Deletes the session with the given token hash. Missing sessions are not an error.
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AppError>;

    /// Removes all sessions that expired before now. Returns their ids.
    async fn delete_expired(&self) -> Result<Vec<i64>, AppError>;
}
