//! Building list and the resident manager page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::application::services::ApartmentIntake;
use crate::domain::entities::{Building, NewResident, Resident, ResidentPatch};
use crate::domain::ordering::ApartmentEntry;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::{FlashQuery, WebError, path_segment, redirect_on_error, redirect_with};

#[derive(Template, WebTemplate)]
#[template(path = "buildings.html")]
struct BuildingsTemplate {
    buildings: Vec<Building>,
    read_only: bool,
}

struct ResidentRow {
    id: Option<i64>,
    name: String,
    priority: String,
    excluded: bool,
}

impl From<&Resident> for ResidentRow {
    fn from(resident: &Resident) -> Self {
        Self {
            id: resident.id,
            name: resident.name.clone(),
            priority: resident.priority.map(|p| p.to_string()).unwrap_or_default(),
            excluded: resident.is_excluded_from_directory(),
        }
    }
}

struct ApartmentView {
    apartment_number: String,
    path: String,
    residents: Vec<ResidentRow>,
}

impl From<&ApartmentEntry> for ApartmentView {
    fn from(entry: &ApartmentEntry) -> Self {
        Self {
            apartment_number: entry.apartment_number.clone(),
            path: path_segment(&entry.apartment_number),
            residents: entry.residents.iter().map(ResidentRow::from).collect(),
        }
    }
}

/// Template for the resident manager.
///
/// Renders `templates/building.html`: apartments in numeric order with their
/// residents in priority order, inline edit/delete forms, the add form, bulk
/// intake, and links to reordering and printable documents.
#[derive(Template, WebTemplate)]
#[template(path = "building.html")]
struct BuildingTemplate {
    building: Building,
    apartments: Vec<ApartmentView>,
    resident_count: usize,
    read_only: bool,
    notice: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResidentForm {
    pub name: String,
    pub apartment_number: String,
    #[serde(default)]
    pub priority: String,
    pub exclude_from_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IntakeForm {
    pub entries: String,
}

/// Parses the optional priority field; blank means "no priority".
fn parse_priority(value: &str) -> Result<Option<u32>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<u32>().map(Some).map_err(|_| {
        AppError::bad_request(
            "Forgangur verður að vera jákvæð heiltala.",
            json!({ "priority": value }),
        )
    })
}

/// Parses the bulk intake text area: one apartment per line as
/// `number: name, name`. Blank lines are ignored; a line without `:` is an
/// apartment with no names, which validation reports.
fn parse_intake(text: &str) -> Vec<ApartmentIntake> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (apartment_number, names) = line.split_once(':').unwrap_or((line, ""));
            ApartmentIntake {
                apartment_number: apartment_number.trim().to_string(),
                names: names
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect()
}

fn building_path(building_id: i64) -> String {
    format!("/buildings/{building_id}")
}

/// Lists buildings.
///
/// # Endpoint
///
/// `GET /buildings`
pub async fn buildings_handler(State(state): State<AppState>) -> Result<Response, WebError> {
    let buildings = state.building_service.list_buildings().await?;

    Ok(BuildingsTemplate {
        buildings,
        read_only: state.read_only,
    }
    .into_response())
}

/// Resident manager for one building.
///
/// # Endpoint
///
/// `GET /buildings/{id}`
pub async fn building_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Query(flash): Query<FlashQuery>,
) -> Result<Response, WebError> {
    let building = state.building_service.get_building(building_id).await?;
    let apartments = state.resident_service.list_apartments(building_id).await?;

    Ok(BuildingTemplate {
        resident_count: apartments.iter().map(|a| a.residents.len()).sum(),
        apartments: apartments.iter().map(ApartmentView::from).collect(),
        building,
        read_only: state.read_only,
        notice: flash.notice,
        error: flash.error,
    }
    .into_response())
}

/// `POST /buildings/{id}/residents`
pub async fn add_resident_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Form(form): Form<ResidentForm>,
) -> Response {
    let path = building_path(building_id);

    let result = async {
        let new_resident = NewResident {
            name: form.name,
            apartment_number: form.apartment_number,
            priority: parse_priority(&form.priority)?,
            building_id,
            exclude_from_directory: form.exclude_from_directory.map(|_| true),
        };
        state.resident_service.create_resident(new_resident).await
    }
    .await;

    match result {
        Ok(resident) => {
            redirect_with(&path, "notice", &format!("{} var skráð(ur).", resident.name))
                .into_response()
        }
        Err(e) => redirect_on_error(&path, e),
    }
}

/// `POST /buildings/{id}/residents/batch`
pub async fn intake_handler(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
    Form(form): Form<IntakeForm>,
) -> Response {
    let path = building_path(building_id);

    match state
        .resident_service
        .create_batch(building_id, parse_intake(&form.entries))
        .await
    {
        Ok(created) => redirect_with(
            &path,
            "notice",
            &format!("{} íbúar voru skráðir.", created.len()),
        )
        .into_response(),
        Err(e) => redirect_on_error(&path, e),
    }
}

/// `POST /buildings/{id}/residents/{resident_id}/edit`
pub async fn edit_resident_handler(
    State(state): State<AppState>,
    Path((building_id, resident_id)): Path<(i64, i64)>,
    Form(form): Form<ResidentForm>,
) -> Response {
    let path = building_path(building_id);

    let result = async {
        let patch = ResidentPatch {
            name: Some(form.name),
            apartment_number: Some(form.apartment_number),
            priority: Some(parse_priority(&form.priority)?),
            exclude_from_directory: Some(Some(form.exclude_from_directory.is_some())),
        };
        state.resident_service.update_resident(resident_id, patch).await
    }
    .await;

    match result {
        Ok(resident) => {
            redirect_with(&path, "notice", &format!("{} var uppfærð(ur).", resident.name))
                .into_response()
        }
        Err(e) => redirect_on_error(&path, e),
    }
}

/// `POST /buildings/{id}/residents/{resident_id}/delete`
pub async fn delete_resident_handler(
    State(state): State<AppState>,
    Path((building_id, resident_id)): Path<(i64, i64)>,
) -> Response {
    let path = building_path(building_id);

    match state.resident_service.delete_resident(resident_id).await {
        Ok(()) => redirect_with(&path, "notice", "Íbúa var eytt.").into_response(),
        Err(e) => redirect_on_error(&path, e),
    }
}
