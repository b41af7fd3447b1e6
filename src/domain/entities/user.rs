//! Administrator accounts and their login sessions.

use chrono::{DateTime, Utc};

/// An administrator who may sign in to the registry.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// PHC-formatted argon2 hash.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A server-side login session.
///
/// Only the HMAC of the session token is stored; the raw token lives in the
/// client's cookie or `Authorization` header.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true once `now` has reached the expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Input data for opening a new session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
