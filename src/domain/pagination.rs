//! Label pagination: splits apartment entries into fixed-capacity label sheets.
//!
//! Each sheet is a grid of `columns × rows` label cells, one cell per apartment.
//! Given `N` entries and `k` labels per sheet the result has `ceil(N / k)` sheets,
//! the last one possibly partial and never padded. Concatenating the sheets'
//! entries reproduces the input order exactly.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::domain::ordering::ApartmentEntry;

/// Grid dimensions of one label sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelLayout {
    pub columns: NonZeroUsize,
    pub rows: NonZeroUsize,
}

impl LabelLayout {
    pub const fn new(columns: NonZeroUsize, rows: NonZeroUsize) -> Self {
        Self { columns, rows }
    }

    /// Number of label cells on one sheet.
    pub fn labels_per_page(&self) -> NonZeroUsize {
        self.columns.saturating_mul(self.rows)
    }
}

impl Default for LabelLayout {
    /// Two columns by three rows on A4.
    fn default() -> Self {
        Self {
            columns: NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN),
            rows: NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// One sheet of mailbox labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPage {
    /// Zero-based sheet index.
    pub index: usize,
    pub entries: Vec<ApartmentEntry>,
}

/// Splits ordered apartment entries into sheets of `labels_per_page` cells.
///
/// Residents inside every cell are put in priority order here; the input is not
/// assumed to be pre-sorted.
pub fn paginate_labels(entries: &[ApartmentEntry], labels_per_page: NonZeroUsize) -> Vec<LabelPage> {
    entries
        .chunks(labels_per_page.get())
        .enumerate()
        .map(|(index, chunk)| LabelPage {
            index,
            entries: chunk.iter().map(ApartmentEntry::sorted_by_priority).collect(),
        })
        .collect()
}
