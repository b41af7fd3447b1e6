//! PostgreSQL implementation of the building repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Building, NewBuilding};
use crate::domain::repositories::BuildingRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct BuildingRow {
    id: i64,
    title: String,
}

impl From<BuildingRow> for Building {
    fn from(row: BuildingRow) -> Self {
        Building::new(row.id, row.title)
    }
}

/// PostgreSQL repository for buildings.
pub struct PgBuildingRepository {
    pool: Arc<PgPool>,
}

impl PgBuildingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BuildingRepository for PgBuildingRepository {
    async fn list(&self) -> Result<Vec<Building>, AppError> {
        let rows = sqlx::query_as::<_, BuildingRow>(
            "SELECT id, title FROM buildings ORDER BY title, id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Building::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Building>, AppError> {
        let row = sqlx::query_as::<_, BuildingRow>("SELECT id, title FROM buildings WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Building::from))
    }

    async fn create(&self, new_building: NewBuilding) -> Result<Building, AppError> {
        let row = sqlx::query_as::<_, BuildingRow>(
            "INSERT INTO buildings (title) VALUES ($1) RETURNING id, title",
        )
        .bind(new_building.title)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
