//! Resident entity and its creation/update inputs.

/// A person living in an apartment of a building.
///
/// `priority` is an ordering hint within the apartment: lower values are listed
/// first, `None` means "no explicit priority" and sorts after every resident that
/// has one. It is never interpreted as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resident {
    /// Assigned by the record store; `None` for records that were never persisted
    /// (e.g. rows read from a spreadsheet source).
    pub id: Option<i64>,
    pub name: String,
    pub apartment_number: String,
    pub priority: Option<u32>,
    pub building_id: i64,
    /// When `Some(true)` the resident is left out of the printed directory but
    /// still appears on mailbox labels.
    pub exclude_from_directory: Option<bool>,
}

impl Resident {
    /// Creates a persisted resident without priority or directory flag.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        apartment_number: impl Into<String>,
        building_id: i64,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            apartment_number: apartment_number.into(),
            priority: None,
            building_id,
            exclude_from_directory: None,
        }
    }

    /// Returns a copy with the given priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns a copy with the directory exclusion flag set.
    pub fn excluded_from_directory(mut self) -> Self {
        self.exclude_from_directory = Some(true);
        self
    }

    /// Whether the resident should be left out of the resident directory.
    pub fn is_excluded_from_directory(&self) -> bool {
        self.exclude_from_directory.unwrap_or(false)
    }
}

/// Input data for creating a new resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResident {
    pub name: String,
    pub apartment_number: String,
    pub priority: Option<u32>,
    pub building_id: i64,
    pub exclude_from_directory: Option<bool>,
}

impl NewResident {
    /// Creates input for a resident with no priority and no directory flag.
    pub fn new(
        building_id: i64,
        apartment_number: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            apartment_number: apartment_number.into(),
            priority: None,
            building_id,
            exclude_from_directory: None,
        }
    }
}

/// Partial update for an existing resident.
///
/// `None` fields are left unchanged. For the nullable columns,
/// `Some(None)` clears the stored value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentPatch {
    pub name: Option<String>,
    pub apartment_number: Option<String>,
    pub priority: Option<Option<u32>>,
    pub exclude_from_directory: Option<Option<bool>>,
}

impl ResidentPatch {
    /// A patch that only sets the priority.
    pub fn priority(priority: u32) -> Self {
        Self {
            priority: Some(Some(priority)),
            ..Self::default()
        }
    }

    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.apartment_number.is_none()
            && self.priority.is_none()
            && self.exclude_from_directory.is_none()
    }

    /// Applies the patch to an in-memory resident.
    pub fn apply_to(&self, resident: &mut Resident) {
        if let Some(name) = &self.name {
            resident.name = name.clone();
        }
        if let Some(apartment_number) = &self.apartment_number {
            resident.apartment_number = apartment_number.clone();
        }
        if let Some(priority) = self.priority {
            resident.priority = priority;
        }
        if let Some(flag) = self.exclude_from_directory {
            resident.exclude_from_directory = flag;
        }
    }
}
