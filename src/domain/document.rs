//! Document assembly: turns ordered resident data into a renderer-agnostic tree.
//!
//! | Kind              | Filtering                      | Ordering                         |
//! |-------------------|--------------------------------|----------------------------------|
//! | Resident directory| drops `exclude_from_directory` | [`sort_by_name`]                 |
//! | Mailbox labels    | none                           | apartments numeric, cells by priority, paginated |
//! | Apartment label   | none                           | one cell, by priority            |
//!
//! Empty input produces a [`DocumentBody::Empty`] with a message so the renderer
//! never has to guess what an empty sheet means.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::{Building, Resident};
use crate::domain::ordering::{ApartmentEntry, apartment_entries, sort_by_name, sort_by_priority};
use crate::domain::pagination::{LabelLayout, paginate_labels};
use crate::error::AppError;

pub const NO_RESIDENTS_MESSAGE: &str = "Engar upplýsingar um íbúa fundust.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    ResidentDirectory,
    MailboxLabels,
    ApartmentLabel,
}

impl DocumentKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::ResidentDirectory => "Íbúalisti",
            Self::MailboxLabels => "Póstkassamerki",
            Self::ApartmentLabel => "Póstkassamerki",
        }
    }

    /// ASCII stem used in download filenames.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ResidentDirectory => "ibualisti",
            Self::MailboxLabels => "postkassamerki",
            Self::ApartmentLabel => "merki",
        }
    }

    /// Parses the URL segment used by the document routes.
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "directory" => Some(Self::ResidentDirectory),
            "labels" => Some(Self::MailboxLabels),
            _ => None,
        }
    }
}

/// Layout hints for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleHints {
    pub page_size: &'static str,
    pub label_columns: usize,
    pub label_rows: usize,
}

impl StyleHints {
    pub fn a4(layout: LabelLayout) -> Self {
        Self {
            page_size: "A4",
            label_columns: layout.columns.get(),
            label_rows: layout.rows.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub apartment_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub apartment_number: String,
    pub heading: String,
    pub names: Vec<String>,
}

impl Label {
    fn from_entry(entry: &ApartmentEntry) -> Self {
        Self {
            apartment_number: entry.apartment_number.clone(),
            heading: format!("Íbúð {}", entry.apartment_number),
            names: entry.residents.iter().map(|r| r.name.clone()).collect(),
        }
    }
}

/// One printed sheet of labels; `number` is one-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSheet {
    pub number: usize,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentBody {
    Directory { entries: Vec<DirectoryEntry> },
    Labels { sheets: Vec<LabelSheet> },
    Empty { message: String },
}

/// Everything a renderer needs to produce one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTree {
    pub kind: DocumentKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub building_title: String,
    pub printed_on: NaiveDate,
    pub style: StyleHints,
    pub body: DocumentBody,
}

impl DocumentTree {
    /// Print date as shown in the footer, e.g. `17.10.2026`.
    pub fn printed_on_display(&self) -> String {
        self.printed_on.format("%-d.%-m.%Y").to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, DocumentBody::Empty { .. })
    }
}

/// Alphabetical resident directory, without residents opted out of it.
pub fn assemble_directory(
    building: &Building,
    residents: &[Resident],
    layout: LabelLayout,
    printed_on: NaiveDate,
) -> DocumentTree {
    let listed: Vec<Resident> = residents
        .iter()
        .filter(|r| !r.is_excluded_from_directory())
        .cloned()
        .collect();

    let body = if listed.is_empty() {
        DocumentBody::Empty {
            message: NO_RESIDENTS_MESSAGE.to_string(),
        }
    } else {
        DocumentBody::Directory {
            entries: sort_by_name(&listed)
                .into_iter()
                .map(|r| DirectoryEntry {
                    name: r.name,
                    apartment_number: r.apartment_number,
                })
                .collect(),
        }
    };

    DocumentTree {
        kind: DocumentKind::ResidentDirectory,
        title: DocumentKind::ResidentDirectory.title().to_string(),
        subtitle: Some("Raðað í stafrófsröð".to_string()),
        building_title: building.title.clone(),
        printed_on,
        style: StyleHints::a4(layout),
        body,
    }
}

/// Mailbox labels for every apartment, one cell per apartment.
pub fn assemble_mailbox_labels(
    building: &Building,
    residents: &[Resident],
    layout: LabelLayout,
    printed_on: NaiveDate,
) -> DocumentTree {
    let pages = paginate_labels(&apartment_entries(residents), layout.labels_per_page());
    let body = if pages.is_empty() {
        DocumentBody::Empty {
            message: NO_RESIDENTS_MESSAGE.to_string(),
        }
    } else {
        DocumentBody::Labels {
            sheets: pages
                .iter()
                .map(|page| LabelSheet {
                    number: page.index + 1,
                    labels: page.entries.iter().map(Label::from_entry).collect(),
                })
                .collect(),
        }
    };

    DocumentTree {
        kind: DocumentKind::MailboxLabels,
        title: DocumentKind::MailboxLabels.title().to_string(),
        subtitle: None,
        building_title: building.title.clone(),
        printed_on,
        style: StyleHints::a4(layout),
        body,
    }
}

/// A single label for one apartment, for replacing one mailbox sign.
pub fn assemble_apartment_label(
    building: &Building,
    apartment_number: &str,
    residents: &[Resident],
    layout: LabelLayout,
    printed_on: NaiveDate,
) -> DocumentTree {
    let tenants: Vec<Resident> = residents
        .iter()
        .filter(|r| r.apartment_number == apartment_number)
        .cloned()
        .collect();

    let body = if tenants.is_empty() {
        DocumentBody::Empty {
            message: NO_RESIDENTS_MESSAGE.to_string(),
        }
    } else {
        let entry = ApartmentEntry {
            apartment_number: apartment_number.to_string(),
            residents: sort_by_priority(&tenants),
        };
        DocumentBody::Labels {
            sheets: vec![LabelSheet {
                number: 1,
                labels: vec![Label::from_entry(&entry)],
            }],
        }
    };

    DocumentTree {
        kind: DocumentKind::ApartmentLabel,
        title: DocumentKind::ApartmentLabel.title().to_string(),
        subtitle: Some(format!("Íbúð {apartment_number}")),
        building_title: building.title.clone(),
        printed_on,
        style: StyleHints::a4(layout),
        body,
    }
}

/// Bytes produced by a [`DocumentRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    /// File extension without the dot.
    pub extension: &'static str,
    pub body: Vec<u8>,
}

/// Turns a [`DocumentTree`] into a printable artifact.
///
/// Failures are reported as [`AppError::Render`].
#[cfg_attr(test, mockall::automock)]
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &DocumentTree) -> Result<RenderedDocument, AppError>;
}
