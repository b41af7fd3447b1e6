//! Account and session store tests against a live PostgreSQL database.
//!
//! Run with `DATABASE_URL` set and `cargo test -- --ignored`.

use std::sync::Arc;

use chrono::{Duration, Utc};
use resident_registry::domain::entities::NewSession;
use resident_registry::domain::repositories::{SessionRepository, UserRepository};
use resident_registry::error::AppError;
use resident_registry::infrastructure::persistence::{PgSessionRepository, PgUserRepository};
use sqlx::PgPool;

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_user_normalizes_email(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));

    let user = repo.create(" Stjorn@Example.IS ", "hash").await.unwrap();

    assert_eq!(user.email, "stjorn@example.is");
    let found = repo.find_by_email("stjorn@example.is").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_user(pool: PgPool) {
    let repo = PgUserRepository::new(Arc::new(pool));
    repo.create("stjorn@example.is", "hash").await.unwrap();

    let err = repo.create("stjorn@example.is", "hash").await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_session_lifecycle(pool: PgPool) {
    let pool = Arc::new(pool);
    let user = PgUserRepository::new(pool.clone())
        .create("stjorn@example.is", "hash")
        .await
        .unwrap();
    let repo = PgSessionRepository::new(pool);

    let session = repo
        .create(NewSession {
            user_id: user.id,
            token_hash: "abc".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();

    let found = repo.find_by_token_hash("abc").await.unwrap();
    assert_eq!(found.map(|s| s.id), Some(session.id));

    repo.delete_by_token_hash("abc").await.unwrap();
    assert!(repo.find_by_token_hash("abc").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_expired_sessions(pool: PgPool) {
    let pool = Arc::new(pool);
    let user = PgUserRepository::new(pool.clone())
        .create("stjorn@example.is", "hash")
        .await
        .unwrap();
    let repo = PgSessionRepository::new(pool);

    for (hash, offset) in [("old", -2), ("older", -30), ("fresh", 60)] {
        repo.create(NewSession {
            user_id: user.id,
            token_hash: hash.to_string(),
            expires_at: Utc::now() + Duration::minutes(offset),
        })
        .await
        .unwrap();
    }

    let deleted = repo.delete_expired().await.unwrap();

    assert_eq!(deleted.len(), 2);
    assert!(repo.find_by_token_hash("fresh").await.unwrap().is_some());
    assert!(repo.find_by_token_hash("old").await.unwrap().is_none());
}
