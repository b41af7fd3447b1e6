//! DTOs for the apartment reorder endpoints.

use serde::{Deserialize, Serialize};

use crate::api::dto::resident::ResidentItem;
use crate::domain::reorder::ReorderSnapshot;

/// Request body for `POST .../reorder/moves`: array-move semantics.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

/// Current state of an apartment's reorder.
///
/// While editing, `residents` is the working copy and a resident's position
/// is the priority it will be saved with.
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub apartment_number: String,
    pub state: &'static str,
    pub dirty: bool,
    pub residents: Vec<ResidentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<ReorderSnapshot> for ReorderResponse {
    fn from(snapshot: ReorderSnapshot) -> Self {
        Self {
            apartment_number: snapshot.apartment_number,
            state: snapshot.state.as_str(),
            dirty: snapshot.dirty,
            residents: snapshot.residents.into_iter().map(ResidentItem::from).collect(),
            last_error: snapshot.last_error,
        }
    }
}
