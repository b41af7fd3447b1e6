//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Administrator login and sessions
//! - [`services::building_service::BuildingService`] - Building listing and creation
//! - [`services::resident_service::ResidentService`] - Resident validation, CRUD and bulk intake
//! - [`services::reorder_service::ReorderService`] - Priority reordering workflow
//! - [`services::document_service::DocumentService`] - Printable directory and labels

pub mod services;
