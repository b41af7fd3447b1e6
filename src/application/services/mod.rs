//! Business logic services for the application layer.

pub mod auth_service;
pub mod building_service;
pub mod document_service;
pub mod reorder_service;
pub mod resident_service;

pub use auth_service::AuthService;
pub use building_service::BuildingService;
pub use document_service::{DocumentService, PrintableDocument};
pub use reorder_service::ReorderService;
pub use resident_service::{ApartmentIntake, ResidentService, ValidationIssue};
