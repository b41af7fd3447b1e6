//! Building entity: the unit residents are registered under.

/// An apartment building managed by the registry.
///
/// Buildings are immutable once created; residents reference them through
/// `building_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub id: i64,
    pub title: String,
}

impl Building {
    /// Creates a new Building instance.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Input data for creating a new building.
#[derive(Debug, Clone)]
pub struct NewBuilding {
    pub title: String,
}
