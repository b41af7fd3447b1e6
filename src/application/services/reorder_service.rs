//! Priority reordering: drives [`ReorderSession`] and persists the result.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Resident, ResidentPatch};
use crate::domain::reorder::{ReorderSession, ReorderSnapshot};
use crate::domain::repositories::{BuildingRepository, ResidentRepository};
use crate::error::AppError;
use crate::infrastructure::drafts::{DraftKey, ReorderDrafts};

const SAVE_FAILED_MESSAGE: &str = "Ekki tókst að vista röðina. Vinsamlegast reyndu aftur.";
const PARTIAL_SAVE_MESSAGE: &str = "Aðeins hluti nýju röðunarinnar vistaðist.";

/// Service behind the reorder pages and API.
///
/// Working copies live in [`ReorderDrafts`]; the record store only sees the
/// final per-resident priority updates.
///
/// # Saving
///
/// 1. The draft moves to `Saving`, so a second save of the same draft is refused.
/// 2. If the apartment's residents changed since editing began the save is
///    refused with [`AppError::Conflict`] and the draft returns to `Editing`.
/// 3. Each resident gets one independent update `priority = position`.
/// 4. All succeeded: reload, back to `Viewing`, draft dropped.
///    Some failed: [`AppError::PartialSave`]. All failed: the store error.
///    Either way the draft returns to `Editing` with the error attached.
pub struct ReorderService {
    residents: Arc<dyn ResidentRepository>,
    buildings: Arc<dyn BuildingRepository>,
    drafts: Arc<ReorderDrafts>,
}

impl ReorderService {
    pub fn new(
        residents: Arc<dyn ResidentRepository>,
        buildings: Arc<dyn BuildingRepository>,
        drafts: Arc<ReorderDrafts>,
    ) -> Self {
        Self {
            residents,
            buildings,
            drafts,
        }
    }

    async fn load_apartment(&self, key: &DraftKey) -> Result<Vec<Resident>, AppError> {
        if self.buildings.find_by_id(key.building_id).await?.is_none() {
            return Err(AppError::not_found(
                "Building not found",
                json!({ "building_id": key.building_id }),
            ));
        }

        Ok(self
            .residents
            .list_by_building(key.building_id)
            .await?
            .into_iter()
            .filter(|r| r.apartment_number == key.apartment_number)
            .collect())
    }

    fn no_draft(key: &DraftKey) -> AppError {
        AppError::conflict(
            "No reorder in progress for this apartment",
            json!({ "apartment_number": key.apartment_number }),
        )
    }

    /// The draft if one exists, otherwise the persisted order in `Viewing`.
    pub async fn view(&self, key: &DraftKey) -> Result<ReorderSnapshot, AppError> {
        if let Some(draft) = self.drafts.get(key).await {
            return Ok(draft.snapshot());
        }

        let residents = self.load_apartment(key).await?;
        if residents.is_empty() {
            return Err(AppError::not_found(
                "Apartment not found",
                json!({ "apartment_number": key.apartment_number }),
            ));
        }
        Ok(ReorderSession::new(key.apartment_number.clone(), &residents).snapshot())
    }

    /// `Viewing → Editing` from freshly loaded residents.
    ///
    /// # Errors
    ///
    /// [`AppError::Conflict`] if this login session is already reordering the
    /// apartment, [`AppError::NotFound`] if the apartment has no residents.
    pub async fn begin_editing(&self, key: &DraftKey) -> Result<ReorderSnapshot, AppError> {
        if let Some(draft) = self.drafts.get(key).await {
            return Err(AppError::conflict(
                "Reorder already in progress",
                json!({ "state": draft.state().as_str() }),
            ));
        }

        let residents = self.load_apartment(key).await?;
        if residents.is_empty() {
            return Err(AppError::not_found(
                "Apartment not found",
                json!({ "apartment_number": key.apartment_number }),
            ));
        }

        let mut session = ReorderSession::new(key.apartment_number.clone(), &residents);
        session.begin_editing()?;
        let snapshot = session.snapshot();

        if !self.drafts.insert_new(key.clone(), session).await {
            return Err(AppError::conflict("Reorder already in progress", json!({})));
        }

        tracing::debug!(
            building_id = key.building_id,
            apartment = %key.apartment_number,
            "Reorder started"
        );
        Ok(snapshot)
    }

    pub async fn move_resident(
        &self,
        key: &DraftKey,
        from: usize,
        to: usize,
    ) -> Result<ReorderSnapshot, AppError> {
        self.drafts
            .update(key, |draft| {
                draft.move_resident(from, to)?;
                Ok::<_, AppError>(draft.snapshot())
            })
            .await
            .ok_or_else(|| Self::no_draft(key))?
    }

    /// Discards the working copy. Cancelling without a draft is a no-op.
    pub async fn cancel(&self, key: &DraftKey) -> Result<ReorderSnapshot, AppError> {
        if let Some(result) = self.drafts.update(key, |draft| draft.cancel()).await {
            result?;
            self.drafts.remove(key).await;
        }
        self.view(key).await
    }

    pub async fn save(&self, key: &DraftKey) -> Result<ReorderSnapshot, AppError> {
        let (assignments, snapshot_ids) = self
            .drafts
            .update(key, |draft| {
                let assignments = draft.begin_save()?;
                Ok::<_, AppError>((assignments, draft.snapshot_ids()))
            })
            .await
            .ok_or_else(|| Self::no_draft(key))??;

        let current = match self.load_apartment(key).await {
            Ok(current) => current,
            Err(e) => return Err(self.fail(key, e).await),
        };

        let mut current_ids: Vec<i64> = current.iter().filter_map(|r| r.id).collect();
        current_ids.sort_unstable();
        if current_ids != snapshot_ids {
            let err = AppError::conflict(
                "Íbúum íbúðarinnar var breytt á meðan. Hættu við og byrjaðu aftur.",
                json!({ "expected": snapshot_ids, "found": current_ids }),
            );
            return Err(self.fail(key, err).await);
        }

        let mut updated = Vec::with_capacity(assignments.len());
        let mut failures = Vec::new();
        for assignment in &assignments {
            match self
                .residents
                .update(assignment.resident_id, ResidentPatch::priority(assignment.priority))
                .await
            {
                Ok(resident) => updated.push(resident),
                Err(e) => {
                    tracing::warn!(
                        resident_id = assignment.resident_id,
                        error = %e,
                        "Priority update failed"
                    );
                    failures.push((assignment.resident_id, e));
                }
            }
        }

        if !failures.is_empty() {
            let failed_ids: Vec<i64> = failures.iter().map(|(id, _)| *id).collect();
            let (err, message) =
                if let Some(pos) = failures.iter().position(|(_, e)| e.is_session_expired()) {
                    let err = failures.swap_remove(pos).1;
                    let message = err.user_message();
                    (err, message)
                } else if updated.is_empty() {
                    (
                        AppError::data_access(
                            SAVE_FAILED_MESSAGE,
                            json!({ "failed": failed_ids }),
                        ),
                        SAVE_FAILED_MESSAGE.to_string(),
                    )
                } else {
                    (
                        AppError::partial_save(
                            PARTIAL_SAVE_MESSAGE,
                            json!({ "failed": failed_ids, "saved": updated.len() }),
                        ),
                        PARTIAL_SAVE_MESSAGE.to_string(),
                    )
                };
            self.mark_failed(key, message).await;
            return Err(err);
        }

        let reloaded = match self.load_apartment(key).await {
            Ok(reloaded) => reloaded,
            Err(e) => {
                tracing::warn!(error = %e, "Reload after save failed, using write results");
                updated
            }
        };

        let snapshot = self
            .drafts
            .update(key, |draft| {
                draft.complete_save(&reloaded)?;
                Ok::<_, AppError>(draft.snapshot())
            })
            .await
            .ok_or_else(|| Self::no_draft(key))??;
        self.drafts.remove(key).await;

        tracing::info!(
            building_id = key.building_id,
            apartment = %key.apartment_number,
            residents = assignments.len(),
            "Priorities saved"
        );
        Ok(snapshot)
    }

    /// Returns the draft to `Editing` with the error attached, and hands the error back.
    async fn fail(&self, key: &DraftKey, err: AppError) -> AppError {
        self.mark_failed(key, err.user_message()).await;
        err
    }

    async fn mark_failed(&self, key: &DraftKey, message: String) {
        if let Some(Err(e)) = self.drafts.update(key, |draft| draft.fail_save(message)).await {
            tracing::warn!(error = %e, "Could not return draft to editing");
        }
    }

    /// Drops every draft of a login session, e.g. on logout.
    pub async fn discard_session(&self, session_id: i64) -> usize {
        self.drafts.remove_session(session_id).await
    }
}
