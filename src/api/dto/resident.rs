//! DTOs for resident endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::serde_as;
use validator::Validate;

use crate::application::services::ApartmentIntake;
use crate::domain::entities::{NewResident, Resident, ResidentPatch};
use crate::domain::ordering::ApartmentEntry;
use crate::error::AppError;

/// JSON representation of a resident.
#[derive(Debug, Serialize)]
pub struct ResidentItem {
    /// `null` for rows read from a spreadsheet source.
    pub id: Option<i64>,
    pub name: String,
    pub apartment_number: String,
    pub priority: Option<u32>,
    pub building_id: i64,
    pub exclude_from_directory: Option<bool>,
}

impl From<Resident> for ResidentItem {
    fn from(resident: Resident) -> Self {
        Self {
            id: resident.id,
            name: resident.name,
            apartment_number: resident.apartment_number,
            priority: resident.priority,
            building_id: resident.building_id,
            exclude_from_directory: resident.exclude_from_directory,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResidentListResponse {
    pub items: Vec<ResidentItem>,
}

/// Query for `GET /api/buildings/{id}/residents`.
#[derive(Debug, Default, Deserialize)]
pub struct ResidentListQuery {
    /// `name` for alphabetical order; anything else keeps store order.
    pub sort: Option<String>,
}

/// One apartment with its residents in priority order.
#[derive(Debug, Serialize)]
pub struct ApartmentItem {
    pub apartment_number: String,
    pub residents: Vec<ResidentItem>,
}

impl From<ApartmentEntry> for ApartmentItem {
    fn from(entry: ApartmentEntry) -> Self {
        Self {
            apartment_number: entry.apartment_number,
            residents: entry.residents.into_iter().map(ResidentItem::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApartmentListResponse {
    pub items: Vec<ApartmentItem>,
}

fn to_priority(value: i64) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| {
        AppError::bad_request(
            "Forgangur verður að vera jákvæð heiltala.",
            json!({ "fields": { "priority": [{ "code": "range", "value": value }] } }),
        )
    })
}

/// Request body for `POST /api/buildings/{id}/residents`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateResidentRequest {
    #[validate(length(max = 200, message = "Name is too long"))]
    pub name: String,

    #[validate(length(max = 32, message = "Apartment number is too long"))]
    pub apartment_number: String,

    pub priority: Option<i64>,

    pub exclude_from_directory: Option<bool>,
}

impl CreateResidentRequest {
    pub fn into_new_resident(self, building_id: i64) -> Result<NewResident, AppError> {
        Ok(NewResident {
            name: self.name,
            apartment_number: self.apartment_number,
            priority: self.priority.map(to_priority).transpose()?,
            building_id,
            exclude_from_directory: self.exclude_from_directory,
        })
    }
}

/// Request body for `PATCH /api/residents/{id}`.
///
/// Absent fields are left unchanged. For `priority` and
/// `exclude_from_directory`, `null` clears the stored value.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResidentRequest {
    #[validate(length(max = 200, message = "Name is too long"))]
    pub name: Option<String>,

    #[validate(length(max = 32, message = "Apartment number is too long"))]
    pub apartment_number: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub priority: Option<Option<i64>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub exclude_from_directory: Option<Option<bool>>,
}

impl UpdateResidentRequest {
    pub fn into_patch(self) -> Result<ResidentPatch, AppError> {
        let priority = match self.priority {
            Some(Some(value)) => Some(Some(to_priority(value)?)),
            Some(None) => Some(None),
            None => None,
        };

        Ok(ResidentPatch {
            name: self.name,
            apartment_number: self.apartment_number,
            priority,
            exclude_from_directory: self.exclude_from_directory,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ApartmentIntakeRequest {
    #[validate(length(max = 32, message = "Apartment number is too long"))]
    pub apartment_number: String,

    #[validate(length(max = 50, message = "Too many residents for one apartment"))]
    pub names: Vec<String>,
}

/// Request body for `POST /api/buildings/{id}/residents/batch`.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchIntakeRequest {
    #[validate(length(max = 500, message = "Too many apartments in one batch"), nested)]
    pub apartments: Vec<ApartmentIntakeRequest>,
}

impl BatchIntakeRequest {
    pub fn into_intake(self) -> Vec<ApartmentIntake> {
        self.apartments
            .into_iter()
            .map(|a| ApartmentIntake {
                apartment_number: a.apartment_number,
                names: a.names,
            })
            .collect()
    }
}
