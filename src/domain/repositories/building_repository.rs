//! Repository trait for buildings.

use crate::domain::entities::{Building, NewBuilding};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for buildings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBuildingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::spreadsheet::SpreadsheetSource`] - Read-only spreadsheet tabs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuildingRepository: Send + Sync {
    /// Lists all buildings ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DataAccess`] when the store cannot be reached.
    async fn list(&self) -> Result<Vec<Building>, AppError>;

    /// Finds a building by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DataAccess`] when the store cannot be reached.
    async fn find_by_id(&self, id: i64) -> Result<Option<Building>, AppError>;

    /// Creates a new building.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a building with the same title exists.
    /// Returns [`AppError::Forbidden`] for read-only sources.
    async fn create(&self, new_building: NewBuilding) -> Result<Building, AppError>;
}
