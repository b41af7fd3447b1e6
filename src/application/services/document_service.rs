//! Printable documents: fetch, assemble, render.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::domain::document::{
    DocumentKind, DocumentRenderer, DocumentTree, assemble_apartment_label, assemble_directory,
    assemble_mailbox_labels,
};
use crate::domain::entities::Building;
use crate::domain::pagination::LabelLayout;
use crate::domain::repositories::{BuildingRepository, ResidentRepository};
use crate::error::AppError;
use crate::utils::filename::document_filename;

/// A rendered document ready to be sent to the browser.
#[derive(Debug, Clone)]
pub struct PrintableDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub struct DocumentService {
    residents: Arc<dyn ResidentRepository>,
    buildings: Arc<dyn BuildingRepository>,
    renderer: Arc<dyn DocumentRenderer>,
    layout: LabelLayout,
}

impl DocumentService {
    pub fn new(
        residents: Arc<dyn ResidentRepository>,
        buildings: Arc<dyn BuildingRepository>,
        renderer: Arc<dyn DocumentRenderer>,
        layout: LabelLayout,
    ) -> Self {
        Self {
            residents,
            buildings,
            renderer,
            layout,
        }
    }

    pub fn layout(&self) -> LabelLayout {
        self.layout
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    async fn building(&self, building_id: i64) -> Result<Building, AppError> {
        self.buildings.find_by_id(building_id).await?.ok_or_else(|| {
            AppError::not_found("Building not found", json!({ "building_id": building_id }))
        })
    }

    /// Assembles the resident directory or the full set of mailbox labels.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for [`DocumentKind::ApartmentLabel`], which
    /// needs an apartment; see [`Self::apartment_label`].
    pub async fn assemble(
        &self,
        building_id: i64,
        kind: DocumentKind,
    ) -> Result<DocumentTree, AppError> {
        let building = self.building(building_id).await?;
        let residents = self.residents.list_by_building(building_id).await?;

        match kind {
            DocumentKind::ResidentDirectory => Ok(assemble_directory(
                &building,
                &residents,
                self.layout,
                Self::today(),
            )),
            DocumentKind::MailboxLabels => Ok(assemble_mailbox_labels(
                &building,
                &residents,
                self.layout,
                Self::today(),
            )),
            DocumentKind::ApartmentLabel => Err(AppError::bad_request(
                "Apartment label requires an apartment number",
                json!({ "kind": kind }),
            )),
        }
    }

    /// Assembles the label for a single apartment.
    pub async fn apartment_label(
        &self,
        building_id: i64,
        apartment_number: &str,
    ) -> Result<DocumentTree, AppError> {
        let building = self.building(building_id).await?;
        let residents = self.residents.list_by_building(building_id).await?;

        Ok(assemble_apartment_label(
            &building,
            apartment_number,
            &residents,
            self.layout,
            Self::today(),
        ))
    }

    /// Renders an assembled document and names the file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Render`] if the renderer fails.
    pub fn render(&self, tree: &DocumentTree) -> Result<PrintableDocument, AppError> {
        let rendered = self.renderer.render(tree).inspect_err(|e| {
            tracing::error!(kind = ?tree.kind, error = %e, "Document rendering failed");
        })?;

        Ok(PrintableDocument {
            filename: document_filename(
                &tree.building_title,
                tree.kind,
                tree.printed_on,
                rendered.extension,
            ),
            content_type: rendered.content_type,
            body: rendered.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{DocumentBody, MockDocumentRenderer, RenderedDocument};
    use crate::domain::entities::Resident;
    use crate::domain::repositories::{MockBuildingRepository, MockResidentRepository};

    fn buildings() -> MockBuildingRepository {
        let mut mock = MockBuildingRepository::new();
        mock.expect_find_by_id()
            .returning(|id| Ok(Some(Building::new(id, "Hátún 10"))));
        mock
    }

    fn residents() -> MockResidentRepository {
        let mut mock = MockResidentRepository::new();
        mock.expect_list_by_building().returning(|building_id| {
            Ok(vec![
                Resident::new(1, "Jón", "2", building_id),
                Resident::new(2, "Anna", "10", building_id).excluded_from_directory(),
            ])
        });
        mock
    }

    fn service(renderer: MockDocumentRenderer) -> DocumentService {
        DocumentService::new(
            Arc::new(residents()),
            Arc::new(buildings()),
            Arc::new(renderer),
            LabelLayout::default(),
        )
    }

    #[tokio::test]
    async fn test_directory_excludes_flagged_residents() {
        let tree = service(MockDocumentRenderer::new())
            .assemble(1, DocumentKind::ResidentDirectory)
            .await
            .unwrap();

        let DocumentBody::Directory { entries } = tree.body else {
            panic!("expected directory body");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Jón");
    }

    #[tokio::test]
    async fn test_labels_include_everyone_in_numeric_order() {
        let tree = service(MockDocumentRenderer::new())
            .assemble(1, DocumentKind::MailboxLabels)
            .await
            .unwrap();

        let DocumentBody::Labels { sheets } = tree.body else {
            panic!("expected labels body");
        };
        let apartments: Vec<_> = sheets[0]
            .labels
            .iter()
            .map(|l| l.apartment_number.as_str())
            .collect();
        assert_eq!(apartments, vec!["2", "10"]);
    }

    #[tokio::test]
    async fn test_unknown_building() {
        let mut buildings = MockBuildingRepository::new();
        buildings.expect_find_by_id().returning(|_| Ok(None));
        let service = DocumentService::new(
            Arc::new(MockResidentRepository::new()),
            Arc::new(buildings),
            Arc::new(MockDocumentRenderer::new()),
            LabelLayout::default(),
        );

        let err = service
            .assemble(5, DocumentKind::MailboxLabels)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_render_names_file() {
        let mut renderer = MockDocumentRenderer::new();
        renderer.expect_render().times(1).returning(|_| {
            Ok(RenderedDocument {
                content_type: "text/html; charset=utf-8",
                extension: "html",
                body: b"<html></html>".to_vec(),
            })
        });
        let service = service(renderer);
        let tree = service.apartment_label(1, "2").await.unwrap();

        let printable = service.render(&tree).unwrap();

        assert!(printable.filename.starts_with("hatun-10-merki-"));
        assert!(printable.filename.ends_with(".html"));
    }

    #[tokio::test]
    async fn test_render_failure_surfaces() {
        let mut renderer = MockDocumentRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Err(AppError::render("template failed", json!({}))));
        let service = service(renderer);
        let tree = service
            .assemble(1, DocumentKind::ResidentDirectory)
            .await
            .unwrap();

        let err = service.render(&tree).unwrap_err();

        assert!(matches!(err, AppError::Render { .. }));
    }
}
