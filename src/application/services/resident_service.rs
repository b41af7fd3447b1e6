//! Resident management: validation, CRUD and multi-apartment intake.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{Building, NewResident, Resident, ResidentPatch};
use crate::domain::ordering::{ApartmentEntry, apartment_entries, sort_by_name};
use crate::domain::repositories::{BuildingRepository, ResidentRepository};
use crate::error::AppError;

const REQUIRED_FIELDS_MESSAGE: &str = "Nafn og íbúðarnúmer eru nauðsynleg.";

/// One problem found while validating input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn validation_error(issues: Vec<ValidationIssue>) -> AppError {
    let message = issues
        .first()
        .map(|issue| issue.message.clone())
        .unwrap_or_else(|| REQUIRED_FIELDS_MESSAGE.to_string());
    AppError::bad_request(message, json!({ "errors": issues }))
}

/// Comparison key for "same name": trimmed and case-insensitive.
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One apartment of a bulk intake: its number and the residents moving in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApartmentIntake {
    pub apartment_number: String,
    pub names: Vec<String>,
}

/// Service for reading and changing residents of a building.
///
/// All writes are validated here before they reach the record store; a write
/// that fails validation never touches the repository.
pub struct ResidentService {
    residents: Arc<dyn ResidentRepository>,
    buildings: Arc<dyn BuildingRepository>,
}

impl ResidentService {
    pub fn new(
        residents: Arc<dyn ResidentRepository>,
        buildings: Arc<dyn BuildingRepository>,
    ) -> Self {
        Self {
            residents,
            buildings,
        }
    }

    async fn building(&self, building_id: i64) -> Result<Building, AppError> {
        self.buildings.find_by_id(building_id).await?.ok_or_else(|| {
            AppError::not_found("Building not found", json!({ "building_id": building_id }))
        })
    }

    /// Residents of a building, in record store order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the building does not exist.
    pub async fn list_residents(&self, building_id: i64) -> Result<Vec<Resident>, AppError> {
        self.building(building_id).await?;
        self.residents.list_by_building(building_id).await
    }

    /// Residents of a building in alphabetical order.
    pub async fn list_by_name(&self, building_id: i64) -> Result<Vec<Resident>, AppError> {
        Ok(sort_by_name(&self.list_residents(building_id).await?))
    }

    /// Apartments in numeric order, each with its residents in priority order.
    pub async fn list_apartments(&self, building_id: i64) -> Result<Vec<ApartmentEntry>, AppError> {
        let residents = self.list_residents(building_id).await?;
        Ok(apartment_entries(&residents)
            .iter()
            .map(ApartmentEntry::sorted_by_priority)
            .collect())
    }

    /// Residents of one apartment, unsorted.
    pub async fn apartment_residents(
        &self,
        building_id: i64,
        apartment_number: &str,
    ) -> Result<Vec<Resident>, AppError> {
        Ok(self
            .list_residents(building_id)
            .await?
            .into_iter()
            .filter(|r| r.apartment_number == apartment_number)
            .collect())
    }

    pub async fn get_resident(&self, id: i64) -> Result<Resident, AppError> {
        self.residents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resident not found", json!({ "resident_id": id })))
    }

    /// Creates one resident.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a blank name or apartment number, or a
    ///   name already registered in the same apartment
    /// - [`AppError::NotFound`] if the building does not exist
    pub async fn create_resident(&self, new_resident: NewResident) -> Result<Resident, AppError> {
        let new_resident = NewResident {
            name: new_resident.name.trim().to_string(),
            apartment_number: new_resident.apartment_number.trim().to_string(),
            ..new_resident
        };

        let mut issues = Vec::new();
        if new_resident.name.is_empty() {
            issues.push(ValidationIssue::new("name", REQUIRED_FIELDS_MESSAGE));
        }
        if new_resident.apartment_number.is_empty() {
            issues.push(ValidationIssue::new("apartment_number", REQUIRED_FIELDS_MESSAGE));
        }
        if !issues.is_empty() {
            return Err(validation_error(issues));
        }

        let existing = self.list_residents(new_resident.building_id).await?;
        if let Some(issue) = collision(
            &existing,
            &new_resident.apartment_number,
            &new_resident.name,
            None,
        ) {
            return Err(validation_error(vec![issue]));
        }

        let resident = self.residents.create(new_resident).await?;
        tracing::info!(
            resident_id = resident.id,
            building_id = resident.building_id,
            "Resident created"
        );
        Ok(resident)
    }

    /// Registers residents for several apartments at once.
    ///
    /// Nothing is stored unless the whole batch is valid, and the store itself
    /// writes the batch all-or-nothing.
    pub async fn create_batch(
        &self,
        building_id: i64,
        intake: Vec<ApartmentIntake>,
    ) -> Result<Vec<Resident>, AppError> {
        let existing = self.list_residents(building_id).await?;

        let new_residents = validate_intake(building_id, &intake, &existing)?;

        let created = self.residents.create_many(new_residents).await?;
        tracing::info!(
            building_id,
            count = created.len(),
            apartments = intake.len(),
            "Residents registered in bulk"
        );
        Ok(created)
    }

    /// Applies a partial update.
    ///
    /// Name and apartment number, when present, are trimmed and must not be
    /// blank; the resulting name must not collide with another resident of the
    /// resulting apartment.
    pub async fn update_resident(&self, id: i64, patch: ResidentPatch) -> Result<Resident, AppError> {
        let current = self.get_resident(id).await?;

        let patch = ResidentPatch {
            name: patch.name.map(|n| n.trim().to_string()),
            apartment_number: patch.apartment_number.map(|a| a.trim().to_string()),
            ..patch
        };

        if patch.is_empty() {
            return Ok(current);
        }

        let mut issues = Vec::new();
        if patch.name.as_deref() == Some("") {
            issues.push(ValidationIssue::new("name", REQUIRED_FIELDS_MESSAGE));
        }
        if patch.apartment_number.as_deref() == Some("") {
            issues.push(ValidationIssue::new("apartment_number", REQUIRED_FIELDS_MESSAGE));
        }
        if !issues.is_empty() {
            return Err(validation_error(issues));
        }

        if patch.name.is_some() || patch.apartment_number.is_some() {
            let mut updated = current.clone();
            patch.apply_to(&mut updated);

            let siblings = self.residents.list_by_building(current.building_id).await?;
            if let Some(issue) = collision(
                &siblings,
                &updated.apartment_number,
                &updated.name,
                current.id,
            ) {
                return Err(validation_error(vec![issue]));
            }
        }

        let resident = self.residents.update(id, patch).await?;
        tracing::info!(resident_id = id, "Resident updated");
        Ok(resident)
    }

    pub async fn delete_resident(&self, id: i64) -> Result<(), AppError> {
        self.residents.delete(id).await?;
        tracing::info!(resident_id = id, "Resident deleted");
        Ok(())
    }
}

/// Finds a persisted resident (other than `except`) with the same name in the
/// same apartment.
fn collision(
    existing: &[Resident],
    apartment_number: &str,
    name: &str,
    except: Option<i64>,
) -> Option<ValidationIssue> {
    let key = name_key(name);
    existing
        .iter()
        .filter(|r| except.is_none() || r.id != except)
        .find(|r| r.apartment_number == apartment_number && name_key(&r.name) == key)
        .map(|r| {
            ValidationIssue::new(
                "name",
                format!(
                    "{} er þegar skráð(ur) í íbúð {}.",
                    r.name, r.apartment_number
                ),
            )
        })
}

/// Checks a bulk intake and turns it into store input.
fn validate_intake(
    building_id: i64,
    intake: &[ApartmentIntake],
    existing: &[Resident],
) -> Result<Vec<NewResident>, AppError> {
    let mut issues = Vec::new();
    let mut seen_apartments = HashSet::new();
    let mut new_residents = Vec::new();

    if intake.is_empty() {
        issues.push(ValidationIssue::new("apartments", "Engar íbúðir í skráningunni."));
    }

    for (position, apartment) in intake.iter().enumerate() {
        let apartment_number = apartment.apartment_number.trim();
        let row = position + 1;

        if apartment_number.is_empty() {
            issues.push(ValidationIssue::new(
                "apartment_number",
                format!("Íbúðarnúmer vantar í línu {row}."),
            ));
            continue;
        }
        if !seen_apartments.insert(apartment_number.to_string()) {
            issues.push(ValidationIssue::new(
                "apartment_number",
                format!("Íbúð {apartment_number} kemur oftar en einu sinni fyrir."),
            ));
            continue;
        }
        if apartment.names.is_empty() {
            issues.push(ValidationIssue::new(
                "names",
                format!("Engin nöfn skráð í íbúð {apartment_number}."),
            ));
            continue;
        }

        let mut seen_names = HashSet::new();
        for name in &apartment.names {
            let name = name.trim();
            if name.is_empty() {
                issues.push(ValidationIssue::new(
                    "names",
                    format!("Nafn vantar í íbúð {apartment_number}."),
                ));
                continue;
            }
            if !seen_names.insert(name_key(name)) {
                issues.push(ValidationIssue::new(
                    "names",
                    format!("{name} kemur oftar en einu sinni fyrir í íbúð {apartment_number}."),
                ));
                continue;
            }
            if let Some(issue) = collision(existing, apartment_number, name, None) {
                issues.push(issue);
                continue;
            }
            new_residents.push(NewResident::new(building_id, apartment_number, name));
        }
    }

    if issues.is_empty() {
        Ok(new_residents)
    } else {
        Err(validation_error(issues))
    }
}
