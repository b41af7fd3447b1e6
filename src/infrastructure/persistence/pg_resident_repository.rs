//! PostgreSQL implementation of the resident repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewResident, Resident, ResidentPatch};
use crate::domain::repositories::ResidentRepository;
use crate::error::AppError;

const RESIDENT_COLUMNS: &str =
    "id, building_id, name, apartment_number, priority, exclude_from_directory";

#[derive(sqlx::FromRow)]
struct ResidentRow {
    id: i64,
    building_id: i64,
    name: String,
    apartment_number: String,
    priority: Option<i32>,
    exclude_from_directory: Option<bool>,
}

impl From<ResidentRow> for Resident {
    fn from(row: ResidentRow) -> Self {
        Resident {
            id: Some(row.id),
            name: row.name,
            apartment_number: row.apartment_number,
            // The column has a CHECK (priority >= 0)
            priority: row.priority.and_then(|p| u32::try_from(p).ok()),
            building_id: row.building_id,
            exclude_from_directory: row.exclude_from_directory,
        }
    }
}

fn priority_column(priority: Option<u32>) -> Result<Option<i32>, AppError> {
    priority
        .map(|p| {
            i32::try_from(p).map_err(|_| {
                AppError::bad_request("Forgangur er of hár.", json!({ "priority": p }))
            })
        })
        .transpose()
}

/// PostgreSQL repository for residents.
///
/// Single writes are independent statements; [`ResidentRepository::create_many`]
/// runs in one transaction.
pub struct PgResidentRepository {
    pool: Arc<PgPool>,
}

impl PgResidentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn insert_sql() -> String {
        format!(
            r#"
            INSERT INTO residents (building_id, name, apartment_number, priority, exclude_from_directory)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RESIDENT_COLUMNS}
            "#
        )
    }
}

#[async_trait]
impl ResidentRepository for PgResidentRepository {
    async fn list_by_building(&self, building_id: i64) -> Result<Vec<Resident>, AppError> {
        let rows = sqlx::query_as::<_, ResidentRow>(&format!(
            "SELECT {RESIDENT_COLUMNS} FROM residents WHERE building_id = $1 ORDER BY id"
        ))
        .bind(building_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Resident::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Resident>, AppError> {
        let row = sqlx::query_as::<_, ResidentRow>(&format!(
            "SELECT {RESIDENT_COLUMNS} FROM residents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Resident::from))
    }

    async fn create(&self, new_resident: NewResident) -> Result<Resident, AppError> {
        let row = sqlx::query_as::<_, ResidentRow>(&Self::insert_sql())
            .bind(new_resident.building_id)
            .bind(&new_resident.name)
            .bind(&new_resident.apartment_number)
            .bind(priority_column(new_resident.priority)?)
            .bind(new_resident.exclude_from_directory)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn create_many(
        &self,
        new_residents: Vec<NewResident>,
    ) -> Result<Vec<Resident>, AppError> {
        let sql = Self::insert_sql();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(new_residents.len());

        for new_resident in new_residents {
            let row = sqlx::query_as::<_, ResidentRow>(&sql)
                .bind(new_resident.building_id)
                .bind(&new_resident.name)
                .bind(&new_resident.apartment_number)
                .bind(priority_column(new_resident.priority)?)
                .bind(new_resident.exclude_from_directory)
                .fetch_one(&mut *tx)
                .await?;
            created.push(Resident::from(row));
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i64, patch: ResidentPatch) -> Result<Resident, AppError> {
        let row = sqlx::query_as::<_, ResidentRow>(&format!(
            r#"
            UPDATE residents
            SET name = COALESCE($2, name),
                apartment_number = COALESCE($3, apartment_number),
                priority = CASE WHEN $4 THEN $5 ELSE priority END,
                exclude_from_directory = CASE WHEN $6 THEN $7 ELSE exclude_from_directory END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RESIDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.apartment_number)
        .bind(patch.priority.is_some())
        .bind(priority_column(patch.priority.flatten())?)
        .bind(patch.exclude_from_directory.is_some())
        .bind(patch.exclude_from_directory.flatten())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Resident::from)
            .ok_or_else(|| AppError::not_found("Resident not found", json!({ "resident_id": id })))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM residents WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Resident not found",
                json!({ "resident_id": id }),
            ));
        }

        Ok(())
    }
}
