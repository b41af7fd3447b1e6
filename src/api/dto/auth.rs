//! DTOs for login and session endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::auth::{AuthenticatedUser, LoginSession};

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 1024, message = "Password is required"))]
    pub password: String,
}

/// Issued session token; send it back as `Authorization: Bearer <token>`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthenticatedUser,
}

impl From<LoginSession> for LoginResponse {
    fn from(session: LoginSession) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
            user: session.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "stjorn@husfelag.is".to_string(),
            password: "leyndo".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
