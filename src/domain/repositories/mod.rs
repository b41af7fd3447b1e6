//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the record store: the core consumes them and never
//! knows whether rows come from PostgreSQL or a published spreadsheet.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` and
//!   `crate::infrastructure::spreadsheet`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`BuildingRepository`] - Building listing and creation
//! - [`ResidentRepository`] - Resident CRUD and bulk intake
//! - [`UserRepository`] - Administrator accounts
//! - [`SessionRepository`] - Login sessions

pub mod building_repository;
pub mod resident_repository;
pub mod user_repository;

pub use building_repository::BuildingRepository;
pub use resident_repository::ResidentRepository;
pub use user_repository::{SessionRepository, UserRepository};

#[cfg(test)]
pub use building_repository::MockBuildingRepository;
#[cfg(test)]
pub use resident_repository::MockResidentRepository;
#[cfg(test)]
pub use user_repository::{MockSessionRepository, MockUserRepository};
