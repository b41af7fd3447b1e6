//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    BuildingService, DocumentService, ReorderService, ResidentService,
};
use crate::domain::auth::AuthProvider;
use crate::domain::document::DocumentRenderer;
use crate::domain::pagination::LabelLayout;
use crate::domain::repositories::{BuildingRepository, ResidentRepository};
use crate::infrastructure::drafts::ReorderDrafts;

/// Cookie settings for browser sessions.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_seconds: i64,
    pub secure_cookies: bool,
}

/// The record store behind the services.
#[derive(Clone)]
pub struct RecordStore {
    pub buildings: Arc<dyn BuildingRepository>,
    pub residents: Arc<dyn ResidentRepository>,
    /// `true` for the spreadsheet source; forms for writes are hidden.
    pub read_only: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub building_service: Arc<BuildingService>,
    pub resident_service: Arc<ResidentService>,
    pub reorder_service: Arc<ReorderService>,
    pub document_service: Arc<DocumentService>,
    pub drafts: Arc<ReorderDrafts>,
    pub session: SessionSettings,
    pub read_only: bool,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: RecordStore,
        renderer: Arc<dyn DocumentRenderer>,
        layout: LabelLayout,
        session: SessionSettings,
        drafts: Arc<ReorderDrafts>,
    ) -> Self {
        Self {
            auth,
            building_service: Arc::new(BuildingService::new(store.buildings.clone())),
            resident_service: Arc::new(ResidentService::new(
                store.residents.clone(),
                store.buildings.clone(),
            )),
            reorder_service: Arc::new(ReorderService::new(
                store.residents.clone(),
                store.buildings.clone(),
                drafts.clone(),
            )),
            document_service: Arc::new(DocumentService::new(
                store.residents,
                store.buildings,
                renderer,
                layout,
            )),
            drafts,
            session,
            read_only: store.read_only,
        }
    }
}
