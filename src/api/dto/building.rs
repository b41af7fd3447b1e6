//! DTOs for buildings.

use serde::Serialize;

use crate::domain::entities::Building;

#[derive(Debug, Serialize)]
pub struct BuildingItem {
    pub id: i64,
    pub title: String,
}

impl From<Building> for BuildingItem {
    fn from(building: Building) -> Self {
        Self {
            id: building.id,
            title: building.title,
        }
    }
}

/// Response for `GET /api/buildings`.
#[derive(Debug, Serialize)]
pub struct BuildingListResponse {
    pub items: Vec<BuildingItem>,
    /// `true` when the data comes from a read-only spreadsheet source.
    pub read_only: bool,
}
