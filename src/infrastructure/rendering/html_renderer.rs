//! Print-ready HTML rendering of assembled documents.

use askama::Template;
use serde_json::json;

use crate::domain::document::{
    DirectoryEntry, DocumentBody, DocumentRenderer, DocumentTree, LabelSheet, RenderedDocument,
};
use crate::error::AppError;

/// Template for a printable document.
///
/// Renders `templates/document.html`: directory table, label grid sheets with
/// page breaks, or the empty-state message. Styles are inlined so the saved
/// file prints the same offline.
#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    document: &'a DocumentTree,
    printed_on: String,
    entries: &'a [DirectoryEntry],
    sheets: &'a [LabelSheet],
    empty_message: Option<&'a str>,
    label_height_mm: usize,
}

/// Usable A4 height in millimetres once page margins are taken off.
const PRINTABLE_HEIGHT_MM: usize = 267;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentRenderer;

impl HtmlDocumentRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for HtmlDocumentRenderer {
    fn render(&self, document: &DocumentTree) -> Result<RenderedDocument, AppError> {
        let (entries, sheets, empty_message): (&[DirectoryEntry], &[LabelSheet], Option<&str>) =
            match &document.body {
                DocumentBody::Directory { entries } => (entries.as_slice(), &[][..], None),
                DocumentBody::Labels { sheets } => (&[][..], sheets.as_slice(), None),
                DocumentBody::Empty { message } => (&[][..], &[][..], Some(message.as_str())),
            };

        let template = DocumentTemplate {
            document,
            printed_on: document.printed_on_display(),
            entries,
            sheets,
            empty_message,
            label_height_mm: PRINTABLE_HEIGHT_MM / document.style.label_rows.max(1),
        };

        let html = template.render().map_err(|e| {
            AppError::render(
                "Failed to render document",
                json!({ "kind": document.kind, "reason": e.to_string() }),
            )
        })?;

        Ok(RenderedDocument {
            content_type: "text/html; charset=utf-8",
            extension: "html",
            body: html.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{
        NO_RESIDENTS_MESSAGE, assemble_directory, assemble_mailbox_labels,
    };
    use crate::domain::entities::{Building, Resident};
    use crate::domain::pagination::LabelLayout;
    use chrono::NaiveDate;

    fn render(tree: &DocumentTree) -> String {
        let rendered = HtmlDocumentRenderer::new().render(tree).unwrap();
        assert_eq!(rendered.extension, "html");
        String::from_utf8(rendered.body).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_directory_lists_names_in_order() {
        let residents = vec![
            Resident::new(1, "Jón", "2", 1),
            Resident::new(2, "Guðrún", "1", 1),
        ];
        let tree = assemble_directory(
            &Building::new(1, "Hátún 10"),
            &residents,
            LabelLayout::default(),
            date(),
        );

        let html = render(&tree);

        let gudrun = html.find("Guðrún").unwrap();
        let jon = html.find("Jón").unwrap();
        assert!(gudrun < jon);
        assert!(html.contains("Íbúalisti"));
        assert!(html.contains("17.10.2026"));
    }

    #[test]
    fn test_labels_break_pages() {
        let residents: Vec<_> = (1..=7)
            .map(|n| Resident::new(n, format!("Íbúi {n}"), n.to_string(), 1))
            .collect();
        let tree = assemble_mailbox_labels(
            &Building::new(1, "Hátún 10"),
            &residents,
            LabelLayout::default(),
            date(),
        );

        let html = render(&tree);

        assert_eq!(html.matches("class=\"sheet\"").count(), 2);
        assert_eq!(html.matches("class=\"label\"").count(), 7);
    }

    #[test]
    fn test_empty_document_shows_message() {
        let tree = assemble_mailbox_labels(
            &Building::new(1, "Hátún 10"),
            &[],
            LabelLayout::default(),
            date(),
        );

        let html = render(&tree);

        assert!(html.contains(NO_RESIDENTS_MESSAGE));
        assert!(!html.contains("class=\"sheet\""));
    }

    #[test]
    fn test_names_are_escaped() {
        let tree = assemble_directory(
            &Building::new(1, "Hús"),
            &[Resident::new(1, "<b>Anna</b>", "1", 1)],
            LabelLayout::default(),
            date(),
        );

        let html = render(&tree);

        assert!(!html.contains("<b>Anna</b>"));
    }
}
