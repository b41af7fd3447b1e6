//! Repository trait for resident records.

use crate::domain::entities::{NewResident, Resident, ResidentPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for residents: the record store consumed by the
/// ordering, reordering and document services.
///
/// Every operation may fail with [`AppError::SessionExpired`] (the backing
/// store rejected our credentials) or [`AppError::DataAccess`] (anything else).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgResidentRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::spreadsheet::SpreadsheetSource`] - Read-only spreadsheet rows
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_resident.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResidentRepository: Send + Sync {
    /// Lists all residents of a building.
    ///
    /// The returned order carries no meaning; callers sort with
    /// [`crate::domain::ordering`].
    async fn list_by_building(&self, building_id: i64) -> Result<Vec<Resident>, AppError>;

    /// Finds a resident by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Resident>, AppError>;

    /// Creates a single resident and returns it with its assigned id.
    async fn create(&self, new_resident: NewResident) -> Result<Resident, AppError>;

    /// Creates many residents at once.
    ///
    /// All-or-nothing: either every resident is stored or an error is returned
    /// and nothing is stored.
    async fn create_many(&self, new_residents: Vec<NewResident>)
    -> Result<Vec<Resident>, AppError>;

    /// Partially updates a resident.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no resident has the given id.
    async fn update(&self, id: i64, patch: ResidentPatch) -> Result<Resident, AppError>;

    /// Deletes a resident.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no resident has the given id.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
