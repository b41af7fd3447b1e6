//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped onto `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgBuildingRepository`] - Buildings
//! - [`PgResidentRepository`] - Residents, including transactional bulk intake
//! - [`PgUserRepository`] - Administrator accounts
//! - [`PgSessionRepository`] - Login sessions

pub mod pg_building_repository;
pub mod pg_resident_repository;
pub mod pg_user_repository;

pub use pg_building_repository::PgBuildingRepository;
pub use pg_resident_repository::PgResidentRepository;
pub use pg_user_repository::{PgSessionRepository, PgUserRepository};
