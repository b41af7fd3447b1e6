//! Read-only record store backed by published spreadsheet CSV exports.
//!
//! Each configured source is one building. Building ids are the 1-based
//! position of the source in `SPREADSHEET_SOURCES`. Rows are fetched on every
//! call; nothing is cached and a failed fetch is always surfaced.
//!
//! Expected columns: `name`, `apartmentNumber`, `priority` and optionally
//! `excludeFromDirectory`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SpreadsheetSourceConfig;
use crate::domain::entities::{Building, NewBuilding, NewResident, Resident, ResidentPatch};
use crate::domain::repositories::{BuildingRepository, ResidentRepository};
use crate::error::AppError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const REQUIRED_COLUMNS: [&str; 2] = ["name", "apartmentNumber"];

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "apartmentNumber", default)]
    apartment_number: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(rename = "excludeFromDirectory", default)]
    exclude_from_directory: Option<String>,
}

pub struct SpreadsheetSource {
    client: reqwest::Client,
    sources: Vec<SpreadsheetSourceConfig>,
}

impl SpreadsheetSource {
    pub fn new(sources: Vec<SpreadsheetSourceConfig>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::internal(
                    "Failed to build HTTP client",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        Ok(Self { client, sources })
    }

    fn source(&self, building_id: i64) -> Option<&SpreadsheetSourceConfig> {
        usize::try_from(building_id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.sources.get(index))
    }

    fn read_only() -> AppError {
        AppError::forbidden(
            "Spreadsheet data is a read-only source",
            json!({ "source": "spreadsheet" }),
        )
    }

    async fn fetch_csv(&self, source: &SpreadsheetSourceConfig) -> Result<String, AppError> {
        let fetch_failed = |reason: String| {
            AppError::data_access(
                "Failed to fetch spreadsheet",
                json!({ "building": source.title, "reason": reason }),
            )
        };

        let response = self
            .client
            .get(&source.csv_url)
            .send()
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(building = %source.title, status = %status, "Spreadsheet fetch rejected");
            return Err(fetch_failed(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| fetch_failed(e.to_string()))
    }
}

fn malformed(reason: impl Into<String>) -> AppError {
    AppError::data_access(
        "Spreadsheet is malformed",
        json!({ "reason": reason.into() }),
    )
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "x" | "já" | "ja" | "yes" => Some(true),
        "false" | "0" | "nei" | "no" => Some(false),
        _ => None,
    }
}

/// Parses a CSV export into residents of `building_id`.
///
/// Fully blank rows are skipped. An unparseable priority or flag is read as
/// absent rather than failing the whole sheet.
pub fn parse_residents(building_id: i64, body: &str) -> Result<Vec<Resident>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers().map_err(|e| malformed(e.to_string()))?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(malformed(format!("missing column '{column}'")));
        }
    }

    let mut residents = Vec::new();
    for (index, record) in reader.deserialize::<SheetRow>().enumerate() {
        let row = record.map_err(|e| malformed(e.to_string()))?;
        let name = row.name.unwrap_or_default();
        let apartment_number = row.apartment_number.unwrap_or_default();
        if name.is_empty() && apartment_number.is_empty() {
            continue;
        }

        let priority = row.priority.as_deref().and_then(|p| {
            let parsed = p.parse::<u32>().ok();
            if parsed.is_none() {
                tracing::debug!(row = index + 2, value = %p, "Ignoring unparseable priority");
            }
            parsed
        });

        residents.push(Resident {
            id: None,
            name,
            apartment_number,
            priority,
            building_id,
            exclude_from_directory: row.exclude_from_directory.as_deref().and_then(parse_flag),
        });
    }

    Ok(residents)
}

#[async_trait]
impl BuildingRepository for SpreadsheetSource {
    async fn list(&self) -> Result<Vec<Building>, AppError> {
        Ok(self
            .sources
            .iter()
            .zip(1_i64..)
            .map(|(source, id)| Building::new(id, source.title.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Building>, AppError> {
        Ok(self
            .source(id)
            .map(|source| Building::new(id, source.title.clone())))
    }

    async fn create(&self, _new_building: NewBuilding) -> Result<Building, AppError> {
        Err(Self::read_only())
    }
}

#[async_trait]
impl ResidentRepository for SpreadsheetSource {
    async fn list_by_building(&self, building_id: i64) -> Result<Vec<Resident>, AppError> {
        let source = self.source(building_id).ok_or_else(|| {
            AppError::not_found("Building not found", json!({ "building_id": building_id }))
        })?;

        let body = self.fetch_csv(source).await?;
        let residents = parse_residents(building_id, &body)?;
        tracing::debug!(building = %source.title, count = residents.len(), "Spreadsheet rows loaded");
        Ok(residents)
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Resident>, AppError> {
        Ok(None)
    }

    async fn create(&self, _new_resident: NewResident) -> Result<Resident, AppError> {
        Err(Self::read_only())
    }

    async fn create_many(
        &self,
        _new_residents: Vec<NewResident>,
    ) -> Result<Vec<Resident>, AppError> {
        Err(Self::read_only())
    }

    async fn update(&self, _id: i64, _patch: ResidentPatch) -> Result<Resident, AppError> {
        Err(Self::read_only())
    }

    async fn delete(&self, _id: i64) -> Result<(), AppError> {
        Err(Self::read_only())
    }
}
