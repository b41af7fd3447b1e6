//! Ordering engine: pure functions that sort and group residents.
//!
//! Nothing here mutates its input or touches the record store. All sorts are
//! stable, so residents with identical sort keys keep their input order.
//!
//! # Priority order
//!
//! Within an apartment residents are ordered by [`compare_by_priority`]:
//!
//! - both have a priority: lower value first, equal values fall back to name
//! - exactly one has a priority: that one first, whatever the value
//! - neither has a priority: name order ([`collation::compare`])
//!
//! # Apartment order
//!
//! Apartment numbers are strings. [`compare_apartment_numbers`] compares them
//! numerically when both sides parse as integers (`"9"` before `"10"`), and falls
//! back to collation for codes like `"2A"` or `"Kjallari"`.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::collation;
use crate::domain::entities::Resident;

/// Returns the residents sorted by name (Icelandic collation).
pub fn sort_by_name(residents: &[Resident]) -> Vec<Resident> {
    let mut sorted = residents.to_vec();
    sorted.sort_by(|a, b| collation::compare(&a.name, &b.name));
    sorted
}

/// Total order used by [`sort_by_priority`].
pub fn compare_by_priority(a: &Resident, b: &Resident) -> Ordering {
    match (a.priority, b.priority) {
        (Some(pa), Some(pb)) => pa
            .cmp(&pb)
            .then_with(|| collation::compare(&a.name, &b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collation::compare(&a.name, &b.name),
    }
}

/// Returns the residents sorted by priority, see the module docs for the rules.
pub fn sort_by_priority(residents: &[Resident]) -> Vec<Resident> {
    let mut sorted = residents.to_vec();
    sorted.sort_by(compare_by_priority);
    sorted
}

/// Compares two apartment numbers.
///
/// - both are ASCII digits only (after trimming): numeric order, ties such as
///   `"01"` vs `"1"` broken by plain string order
/// - numeric codes sort before non-numeric ones, so `"+5"` is not numeric
/// - otherwise Icelandic collation
pub fn compare_apartment_numbers(a: &str, b: &str) -> Ordering {
    match (apartment_number_value(a), apartment_number_value(b)) {
        (Some(na), Some(nb)) => na.cmp(&nb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collation::compare(a, b),
    }
}

fn apartment_number_value(code: &str) -> Option<u64> {
    let code = code.trim();
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    code.parse().ok()
}

/// One apartment and the residents registered to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApartmentEntry {
    pub apartment_number: String,
    pub residents: Vec<Resident>,
}

impl ApartmentEntry {
    /// Returns a copy with the residents in priority order.
    pub fn sorted_by_priority(&self) -> Self {
        Self {
            apartment_number: self.apartment_number.clone(),
            residents: sort_by_priority(&self.residents),
        }
    }
}

/// Residents partitioned by exact apartment number.
///
/// Groups are kept in order of first appearance in the input; within a group
/// residents keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApartmentGroups {
    entries: Vec<ApartmentEntry>,
}

impl ApartmentGroups {
    /// Residents of one apartment, if any are registered.
    pub fn get(&self, apartment_number: &str) -> Option<&[Resident]> {
        self.entries
            .iter()
            .find(|e| e.apartment_number == apartment_number)
            .map(|e| e.residents.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apartment numbers in order of first appearance.
    pub fn apartment_numbers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.apartment_number.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApartmentEntry> {
        self.entries.iter()
    }

    /// Consumes the groups, returning entries ordered by apartment number.
    ///
    /// Residents inside each entry are left in input order.
    pub fn into_sorted_entries(self) -> Vec<ApartmentEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| compare_apartment_numbers(&a.apartment_number, &b.apartment_number));
        entries
    }
}

impl IntoIterator for ApartmentGroups {
    type Item = ApartmentEntry;
    type IntoIter = std::vec::IntoIter<ApartmentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Partitions residents by apartment number without sorting them.
///
/// An empty apartment number is a key like any other.
pub fn group_by_apartment(residents: &[Resident]) -> ApartmentGroups {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<ApartmentEntry> = Vec::new();

    for resident in residents {
        let slot = *index
            .entry(resident.apartment_number.as_str())
            .or_insert_with(|| {
                entries.push(ApartmentEntry {
                    apartment_number: resident.apartment_number.clone(),
                    residents: Vec::new(),
                });
                entries.len() - 1
            });
        entries[slot].residents.push(resident.clone());
    }

    ApartmentGroups { entries }
}

/// Groups residents and orders the groups by apartment number.
///
/// Residents inside each entry keep input order; apply
/// [`ApartmentEntry::sorted_by_priority`] where a listing order is needed.
pub fn apartment_entries(residents: &[Resident]) -> Vec<ApartmentEntry> {
    group_by_apartment(residents).into_sorted_entries()
}
