//! Building listing and creation.

use crate::domain::collation;
use crate::domain::entities::{Building, NewBuilding};
use crate::domain::repositories::BuildingRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Maximum length of a building title in characters.
const MAX_TITLE_LENGTH: usize = 200;

/// Service for the buildings an administrator can pick from.
pub struct BuildingService {
    repository: Arc<dyn BuildingRepository>,
}

impl BuildingService {
    /// Creates a new building service.
    pub fn new(repository: Arc<dyn BuildingRepository>) -> Self {
        Self { repository }
    }

    /// Lists all buildings, ordered by title in Icelandic collation.
    pub async fn list_buildings(&self) -> Result<Vec<Building>, AppError> {
        let mut buildings = self.repository.list().await?;
        buildings.sort_by(|a, b| collation::compare(&a.title, &b.title));
        Ok(buildings)
    }

    /// Gets a building by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no building has this id.
    pub async fn get_building(&self, id: i64) -> Result<Building, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Building not found", json!({ "building_id": id })))
    }

    /// Creates a building.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty or overlong title and
    /// [`AppError::Conflict`] if the title is taken.
    pub async fn create_building(&self, title: &str) -> Result<Building, AppError> {
        let title = title.trim();

        if title.is_empty() {
            return Err(AppError::bad_request(
                "Heiti húss vantar.",
                json!({ "field": "title" }),
            ));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(AppError::bad_request(
                "Heiti húss er of langt.",
                json!({ "field": "title", "max_length": MAX_TITLE_LENGTH }),
            ));
        }

        let building = self
            .repository
            .create(NewBuilding {
                title: title.to_string(),
            })
            .await?;

        tracing::info!(building_id = building.id, "Building created");
        Ok(building)
    }
}
