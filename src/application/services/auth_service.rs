//! Authentication service: administrator logins and session tokens.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::auth::{AuthProvider, AuthenticatedUser, LoginSession};
use crate::domain::entities::NewSession;
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::drafts::ReorderDrafts;
use crate::utils::session_token::generate_session_token;

type HmacSha256 = Hmac<Sha256>;

/// Session-based [`AuthProvider`] backed by the user and session repositories.
///
/// Session tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// storage and comparison. An attacker with read-only access to the database
/// cannot use or forge sessions without the server-side secret.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    signing_secret: String,
    session_ttl: Duration,
    drafts: Option<Arc<ReorderDrafts>>,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - administrator accounts
    /// - `sessions` - login session storage
    /// - `signing_secret` - HMAC key; changing it invalidates every session
    /// - `session_ttl_minutes` - lifetime of a new session
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        signing_secret: String,
        session_ttl_minutes: i64,
    ) -> Self {
        Self {
            users,
            sessions,
            signing_secret,
            session_ttl: Duration::minutes(session_ttl_minutes),
            drafts: None,
        }
    }

    /// Reorder drafts of a session are dropped when the session expires.
    pub fn with_reorder_drafts(mut self, drafts: Arc<ReorderDrafts>) -> Self {
        self.drafts = Some(drafts);
        self
    }

    async fn drop_drafts(&self, session_id: i64) {
        if let Some(drafts) = &self.drafts {
            let dropped = drafts.remove_session(session_id).await;
            if dropped > 0 {
                tracing::debug!(session_id, dropped, "Dropped reorder drafts of ended session");
            }
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|e| AppError::internal("Invalid signing key", json!({ "reason": e.to_string() })))?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Hashes a password with Argon2id and a random salt (PHC string format).
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::fill(&mut salt_bytes).map_err(|e| {
            AppError::internal("Failed to generate salt", json!({ "reason": e.to_string() }))
        })?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
            AppError::internal("Failed to encode salt", json!({ "reason": e.to_string() }))
        })?;

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
    }

    fn verify_password(password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                false
            }
        }
    }

    /// Deletes sessions past their expiry along with their reorder drafts.
    /// Returns the number of sessions removed.
    pub async fn purge_expired_sessions(&self) -> Result<usize, AppError> {
        let removed = self.sessions.delete_expired().await?;
        for &session_id in &removed {
            self.drop_drafts(session_id).await;
        }
        if !removed.is_empty() {
            tracing::info!(removed = removed.len(), "Purged expired sessions");
        }
        Ok(removed.len())
    }
}

#[async_trait]
impl AuthProvider for AuthService {
    async fn login(&self, email: &str, password: &str) -> Result<Option<LoginSession>, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!("Login failed: unknown email");
            return Ok(None);
        };

        if !Self::verify_password(password, &user.password_hash) {
            tracing::info!(user_id = user.id, "Login failed: wrong password");
            return Ok(None);
        }

        let token = generate_session_token()?;
        let expires_at = Utc::now() + self.session_ttl;
        let session = self
            .sessions
            .create(NewSession {
                user_id: user.id,
                token_hash: self.hash_token(&token)?,
                expires_at,
            })
            .await?;

        tracing::info!(user_id = user.id, session_id = session.id, "User logged in");

        Ok(Some(LoginSession {
            token,
            user: AuthenticatedUser {
                user_id: user.id,
                email: user.email,
                session_id: session.id,
            },
            expires_at,
        }))
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(token)?;
        self.sessions.delete_by_token_hash(&token_hash).await
    }

    async fn current_user(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_hash = self.hash_token(token)?;

        let Some(session) = self.sessions.find_by_token_hash(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid or missing session" }),
            ));
        };

        if session.is_expired_at(Utc::now()) {
            if let Err(e) = self.sessions.delete_by_token_hash(&token_hash).await {
                tracing::warn!(error = %e, session_id = session.id, "Failed to delete expired session");
            }
            self.drop_drafts(session.id).await;
            return Err(AppError::session_expired(
                "Session expired",
                json!({ "expired_at": session.expires_at }),
            ));
        }

        let Some(user) = self.users.find_by_id(session.user_id).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Session user no longer exists" }),
            ));
        };

        Ok(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Resident, Session, User};
    use crate::domain::reorder::ReorderSession;
    use crate::domain::repositories::{MockSessionRepository, MockUserRepository};
    use crate::infrastructure::drafts::DraftKey;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn compute_expected_hash(token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(test_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn user(password: &str) -> User {
        User {
            id: 7,
            email: "stjorn@example.is".to_string(),
            password_hash: AuthService::hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn session(expires_in: Duration) -> Session {
        Session {
            id: 11,
            user_id: 7,
            token_hash: "irrelevant".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + expires_in,
        }
    }

    fn service(users: MockUserRepository, sessions: MockSessionRepository) -> AuthService {
        AuthService::new(Arc::new(users), Arc::new(sessions), test_secret(), 60)
    }

    #[tokio::test]
    async fn test_login_success_creates_session() {
        let mut users = MockUserRepository::new();
        let mut sessions = MockSessionRepository::new();
        let stored = user("rétt-lykilorð");

        users
            .expect_find_by_email()
            .withf(|email| email == "stjorn@example.is")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        sessions
            .expect_create()
            .withf(|new| new.user_id == 7 && new.token_hash.len() == 64)
            .times(1)
            .returning(|new| {
                Ok(Session {
                    id: 11,
                    user_id: new.user_id,
                    token_hash: new.token_hash,
                    created_at: Utc::now(),
                    expires_at: new.expires_at,
                })
            });

        let login = service(users, sessions)
            .login("  Stjorn@Example.is ", "rétt-lykilorð")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(login.user.user_id, 7);
        assert_eq!(login.user.session_id, 11);
        assert_eq!(login.token.len(), 43);
        assert!(login.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        let mut sessions = MockSessionRepository::new();
        let stored = user("rétt-lykilorð");

        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));
        sessions.expect_create().times(0);

        let result = service(users, sessions).login("stjorn@example.is", "rangt").await;

        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let result = service(users, MockSessionRepository::new())
            .login("nobody@example.is", "x")
            .await;

        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_user_valid_session() {
        let mut users = MockUserRepository::new();
        let mut sessions = MockSessionRepository::new();
        let expected_hash = compute_expected_hash("valid-token");
        let stored = user("x");

        sessions
            .expect_find_by_token_hash()
            .withf(move |hash| hash == &expected_hash)
            .times(1)
            .returning(|_| Ok(Some(session(Duration::minutes(5)))));
        users
            .expect_find_by_id()
            .withf(|id| *id == 7)
            .returning(move |_| Ok(Some(stored.clone())));

        let current = service(users, sessions).current_user("valid-token").await.unwrap();

        assert_eq!(current.email, "stjorn@example.is");
        assert_eq!(current.session_id, 11);
    }

    #[tokio::test]
    async fn test_current_user_unknown_token() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_by_token_hash().returning(|_| Ok(None));

        let result = service(MockUserRepository::new(), sessions)
            .current_user("invalid-token")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_current_user_expired_session_is_deleted() {
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_token_hash()
            .returning(|_| Ok(Some(session(Duration::minutes(-1)))));
        sessions
            .expect_delete_by_token_hash()
            .times(1)
            .returning(|_| Ok(()));

        let result = service(MockUserRepository::new(), sessions)
            .current_user("old-token")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::SessionExpired { .. }));
    }

    #[tokio::test]
    async fn test_is_authenticated() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_by_token_hash().returning(|_| Ok(None));

        assert!(
            !service(MockUserRepository::new(), sessions)
                .is_authenticated("nope")
                .await
        );
    }

    #[tokio::test]
    async fn test_logout_deletes_hashed_token() {
        let mut sessions = MockSessionRepository::new();
        let expected_hash = compute_expected_hash("token");
        sessions
            .expect_delete_by_token_hash()
            .withf(move |hash| hash == &expected_hash)
            .times(1)
            .returning(|_| Ok(()));

        let result = service(MockUserRepository::new(), sessions).logout("token").await;

        assert!(result.is_ok());
    }

    async fn drafts_for(session_ids: &[i64]) -> Arc<ReorderDrafts> {
        let drafts = Arc::new(ReorderDrafts::new());
        for &session_id in session_ids {
            let key = DraftKey::new(session_id, 1, "101");
            let session = ReorderSession::new("101", &[Resident::new(1, "Anna", "101", 1)]);
            assert!(drafts.insert_new(key, session).await);
        }
        drafts
    }

    #[tokio::test]
    async fn test_expired_session_drops_its_drafts() {
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_token_hash()
            .returning(|_| Ok(Some(session(Duration::minutes(-1)))));
        sessions.expect_delete_by_token_hash().returning(|_| Ok(()));
        let drafts = drafts_for(&[11, 12]).await;
        let svc = service(MockUserRepository::new(), sessions).with_reorder_drafts(drafts.clone());

        let err = svc.current_user("token").await.unwrap_err();

        assert!(err.is_session_expired());
        assert_eq!(drafts.len().await, 1);
        assert!(drafts.get(&DraftKey::new(12, 1, "101")).await.is_some());
    }

    #[tokio::test]
    async fn test_purge_drops_drafts_of_purged_sessions() {
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_delete_expired()
            .times(1)
            .returning(|| Ok(vec![11, 13]));
        let drafts = drafts_for(&[11, 12, 13]).await;
        let svc = service(MockUserRepository::new(), sessions).with_reorder_drafts(drafts.clone());

        let removed = svc.purge_expired_sessions().await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(drafts.len().await, 1);
        assert!(drafts.get(&DraftKey::new(12, 1, "101")).await.is_some());
    }

    #[test]
    fn test_hash_token_consistency() {
        let svc = service(MockUserRepository::new(), MockSessionRepository::new());

        let hash1 = svc.hash_token("test-token").unwrap();
        let hash2 = svc.hash_token("test-token").unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, svc.hash_token("other-token").unwrap());
    }

    #[test]
    fn test_hash_token_secret_matters() {
        let svc1 = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSessionRepository::new()),
            "secret-a".to_string(),
            60,
        );
        let svc2 = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSessionRepository::new()),
            "secret-b".to_string(),
            60,
        );

        assert_ne!(svc1.hash_token("token").unwrap(), svc2.hash_token("token").unwrap());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = AuthService::hash_password("lykilorð").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(AuthService::verify_password("lykilorð", &hash));
        assert!(!AuthService::verify_password("annað", &hash));
        assert!(!AuthService::verify_password("lykilorð", "not-a-phc-string"));
    }
}
