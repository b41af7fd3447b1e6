//! Priority reordering workflow for the residents of one apartment.
//!
//! ```text
//!   Viewing ──begin_editing──▶ Editing ──begin_save──▶ Saving
//!      ▲                        │  ▲                     │
//!      └────────cancel──────────┘  └──────fail_save──────┤
//!      ▲                                                 │
//!      └───────────────────complete_save─────────────────┘
//! ```
//!
//! While editing, the position of a resident in the working copy is its
//! candidate priority. Saving hands out one [`PriorityAssignment`] per resident;
//! persisting them is the caller's job (see
//! [`crate::application::services::ReorderService`]).

use thiserror::Error;

use crate::domain::entities::Resident;
use crate::domain::ordering::sort_by_priority;

/// Workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderState {
    Viewing,
    Editing,
    Saving,
}

impl ReorderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewing => "viewing",
            Self::Editing => "editing",
            Self::Saving => "saving",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: ReorderState,
    },

    #[error("position {index} is out of range for {len} residents")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("resident '{name}' has not been saved yet")]
    UnsavedResident { name: String },
}

/// New priority for one resident: its index in the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAssignment {
    pub resident_id: i64,
    pub priority: u32,
}

/// Read-only view of a session, for handlers and templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderSnapshot {
    pub apartment_number: String,
    pub state: ReorderState,
    pub dirty: bool,
    pub residents: Vec<Resident>,
    pub last_error: Option<String>,
}

/// One apartment's reorder session.
#[derive(Debug, Clone)]
pub struct ReorderSession {
    apartment_number: String,
    persisted: Vec<Resident>,
    working: Vec<Resident>,
    state: ReorderState,
    dirty: bool,
    last_error: Option<String>,
}

impl ReorderSession {
    /// Starts in `Viewing` with the residents in their persisted priority order.
    pub fn new(apartment_number: impl Into<String>, residents: &[Resident]) -> Self {
        Self {
            apartment_number: apartment_number.into(),
            persisted: sort_by_priority(residents),
            working: Vec::new(),
            state: ReorderState::Viewing,
            dirty: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> ReorderState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn apartment_number(&self) -> &str {
        &self.apartment_number
    }

    /// The order currently shown: the working copy while editing or saving,
    /// otherwise the persisted order.
    pub fn residents(&self) -> &[Resident] {
        match self.state {
            ReorderState::Viewing => &self.persisted,
            ReorderState::Editing | ReorderState::Saving => &self.working,
        }
    }

    /// Ids of the residents captured when editing began.
    pub fn snapshot_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.persisted.iter().filter_map(|r| r.id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn snapshot(&self) -> ReorderSnapshot {
        ReorderSnapshot {
            apartment_number: self.apartment_number.clone(),
            state: self.state,
            dirty: self.dirty,
            residents: self.residents().to_vec(),
            last_error: self.last_error.clone(),
        }
    }

    /// `Viewing → Editing`: snapshots the persisted order as the working copy.
    pub fn begin_editing(&mut self) -> Result<(), ReorderError> {
        self.expect_state(ReorderState::Viewing, "begin editing")?;
        self.working = self.persisted.clone();
        self.state = ReorderState::Editing;
        self.dirty = false;
        self.last_error = None;
        Ok(())
    }

    /// Moves the resident at `from` to `to`; everything in between shifts by one.
    pub fn move_resident(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        self.expect_state(ReorderState::Editing, "move a resident")?;

        let len = self.working.len();
        for index in [from, to] {
            if index >= len {
                return Err(ReorderError::IndexOutOfRange { index, len });
            }
        }

        if from != to {
            let resident = self.working.remove(from);
            self.working.insert(to, resident);
            self.dirty = true;
        }
        Ok(())
    }

    /// Discards the working copy. A no-op while viewing.
    pub fn cancel(&mut self) -> Result<(), ReorderError> {
        match self.state {
            ReorderState::Saving => Err(ReorderError::InvalidTransition {
                action: "cancel",
                state: self.state,
            }),
            ReorderState::Viewing | ReorderState::Editing => {
                self.working.clear();
                self.state = ReorderState::Viewing;
                self.dirty = false;
                self.last_error = None;
                Ok(())
            }
        }
    }

    /// `Editing → Saving`: returns the priority each resident should get.
    pub fn begin_save(&mut self) -> Result<Vec<PriorityAssignment>, ReorderError> {
        self.expect_state(ReorderState::Editing, "save")?;

        let assignments = self
            .working
            .iter()
            .enumerate()
            .map(|(index, resident)| {
                let resident_id = resident.id.ok_or_else(|| ReorderError::UnsavedResident {
                    name: resident.name.clone(),
                })?;
                let priority = u32::try_from(index).map_err(|_| ReorderError::IndexOutOfRange {
                    index,
                    len: self.working.len(),
                })?;
                Ok(PriorityAssignment {
                    resident_id,
                    priority,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.state = ReorderState::Saving;
        Ok(assignments)
    }

    /// `Saving → Viewing` with the reloaded residents as the new persisted order.
    pub fn complete_save(&mut self, reloaded: &[Resident]) -> Result<(), ReorderError> {
        self.expect_state(ReorderState::Saving, "complete a save")?;
        self.persisted = sort_by_priority(reloaded);
        self.working.clear();
        self.state = ReorderState::Viewing;
        self.dirty = false;
        self.last_error = None;
        Ok(())
    }

    /// `Saving → Editing`, keeping the working copy and surfacing `message`.
    pub fn fail_save(&mut self, message: impl Into<String>) -> Result<(), ReorderError> {
        self.expect_state(ReorderState::Saving, "fail a save")?;
        self.state = ReorderState::Editing;
        self.last_error = Some(message.into());
        Ok(())
    }

    fn expect_state(&self, expected: ReorderState, action: &'static str) -> Result<(), ReorderError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReorderError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}
