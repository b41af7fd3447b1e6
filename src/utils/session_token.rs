//! Session token generation and the `session_token` cookie.
//!
//! Tokens are 32 random bytes encoded as URL-safe base64 without padding.
//! Only an HMAC of the token is stored (see
//! [`crate::application::services::AuthService`]).

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Name of the cookie holding the raw session token.
pub const SESSION_COOKIE: &str = "session_token";

const TOKEN_LENGTH_BYTES: usize = 32;

/// Generates a new random session token (43 characters).
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_session_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate session token",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Extracts the session token from the `Cookie` header.
///
/// Handles multiple cookies in one header and ignores all but `session_token`.
pub fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(SESSION_COOKIE), Some(value)) if !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}

/// `Set-Cookie` value that stores the token for `max_age_seconds`.
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}{secure}"
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_generate_session_token_length_and_alphabet() {
        let token = generate_session_token().unwrap();

        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_session_token_unique() {
        assert_ne!(
            generate_session_token().unwrap(),
            generate_session_token().unwrap()
        );
    }

    #[test]
    fn test_token_from_cookies_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session_token=abc123; lang=is"),
        );

        assert_eq!(token_from_cookies(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_token_from_cookies_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_cookies(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("session_token="));
        assert_eq!(token_from_cookies(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 600, true);

        assert!(cookie.starts_with("session_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=600"));
        assert!(cookie.ends_with("; Secure"));
        assert!(!session_cookie("tok", 600, false).contains("Secure"));
    }

    #[test]
    fn test_clear_session_cookie() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
