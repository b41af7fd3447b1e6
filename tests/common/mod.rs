#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use resident_registry::application::services::AuthService;
use resident_registry::domain::auth::AuthProvider;
use resident_registry::domain::document::{DocumentRenderer, DocumentTree, RenderedDocument};
use resident_registry::domain::entities::{
    Building, NewBuilding, NewResident, NewSession, Resident, ResidentPatch, Session, User,
};
use resident_registry::domain::pagination::LabelLayout;
use resident_registry::domain::repositories::{
    BuildingRepository, ResidentRepository, SessionRepository, UserRepository,
};
use resident_registry::error::AppError;
use resident_registry::infrastructure::drafts::ReorderDrafts;
use resident_registry::infrastructure::rendering::HtmlDocumentRenderer;
use resident_registry::routes::router;
use resident_registry::state::{AppState, RecordStore, SessionSettings};
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const ADMIN_EMAIL: &str = "stjorn@example.is";
pub const ADMIN_PASSWORD: &str = "leyndarmal-123";

/// Buildings and residents kept in memory, with switches to make reads or
/// particular resident updates fail.
#[derive(Default)]
pub struct MemoryStore {
    buildings: Mutex<Vec<Building>>,
    residents: Mutex<Vec<Resident>>,
    next_id: Mutex<i64>,
    failing_updates: Mutex<HashSet<i64>>,
    reads_fail: AtomicBool,
}

impl MemoryStore {
    fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }

    pub fn add_building(&self, title: &str) -> i64 {
        let id = self.next_id();
        self.buildings
            .lock()
            .unwrap()
            .push(Building::new(id, title));
        id
    }

    pub fn add_resident(
        &self,
        building_id: i64,
        apartment_number: &str,
        name: &str,
        priority: Option<u32>,
    ) -> i64 {
        let id = self.next_id();
        let mut resident = Resident::new(id, name, apartment_number, building_id);
        resident.priority = priority;
        self.residents.lock().unwrap().push(resident);
        id
    }

    pub fn exclude_from_directory(&self, id: i64) {
        if let Some(resident) = self
            .residents
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.id == Some(id))
        {
            resident.exclude_from_directory = Some(true);
        }
    }

    pub fn resident(&self, id: i64) -> Option<Resident> {
        self.residents
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == Some(id))
            .cloned()
    }

    pub fn residents_of(&self, building_id: i64) -> Vec<Resident> {
        self.residents
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.building_id == building_id)
            .cloned()
            .collect()
    }

    pub fn fail_updates_for(&self, resident_id: i64) {
        self.failing_updates.lock().unwrap().insert(resident_id);
    }

    pub fn heal_updates(&self) {
        self.failing_updates.lock().unwrap().clear();
    }

    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), AppError> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(AppError::data_access(
                "Database error",
                json!({ "reason": "connection refused" }),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BuildingRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Building>, AppError> {
        self.check_reads()?;
        Ok(self.buildings.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Building>, AppError> {
        self.check_reads()?;
        Ok(self
            .buildings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn create(&self, new_building: NewBuilding) -> Result<Building, AppError> {
        let id = self.add_building(&new_building.title);
        Ok(Building::new(id, new_building.title))
    }
}

#[async_trait]
impl ResidentRepository for MemoryStore {
    async fn list_by_building(&self, building_id: i64) -> Result<Vec<Resident>, AppError> {
        self.check_reads()?;
        Ok(self.residents_of(building_id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Resident>, AppError> {
        self.check_reads()?;
        Ok(self.resident(id))
    }

    async fn create(&self, new_resident: NewResident) -> Result<Resident, AppError> {
        let resident = Resident {
            id: Some(self.next_id()),
            name: new_resident.name,
            apartment_number: new_resident.apartment_number,
            priority: new_resident.priority,
            building_id: new_resident.building_id,
            exclude_from_directory: new_resident.exclude_from_directory,
        };
        self.residents.lock().unwrap().push(resident.clone());
        Ok(resident)
    }

    async fn create_many(
        &self,
        new_residents: Vec<NewResident>,
    ) -> Result<Vec<Resident>, AppError> {
        let mut created = Vec::with_capacity(new_residents.len());
        for new_resident in new_residents {
            created.push(ResidentRepository::create(self, new_resident).await?);
        }
        Ok(created)
    }

    async fn update(&self, id: i64, patch: ResidentPatch) -> Result<Resident, AppError> {
        if self.failing_updates.lock().unwrap().contains(&id) {
            return Err(AppError::data_access(
                "Database error",
                json!({ "resident_id": id }),
            ));
        }

        let mut residents = self.residents.lock().unwrap();
        let resident = residents
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or_else(|| AppError::not_found("Resident not found", json!({ "id": id })))?;
        patch.apply_to(resident);
        Ok(resident.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut residents = self.residents.lock().unwrap();
        let before = residents.len();
        residents.retain(|r| r.id != Some(id));
        if residents.len() == before {
            return Err(AppError::not_found("Resident not found", json!({ "id": id })));
        }
        Ok(())
    }
}

/// Administrator accounts and sessions kept in memory.
#[derive(Default)]
pub struct MemoryAccounts {
    users: Mutex<Vec<User>>,
    sessions: Mutex<Vec<Session>>,
}

impl MemoryAccounts {
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn expire_all_sessions(&self) {
        for session in self.sessions.lock().unwrap().iter_mut() {
            session.expires_at = Utc::now() - chrono::Duration::minutes(1);
        }
    }
}

#[async_trait]
impl UserRepository for MemoryAccounts {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

#[async_trait]
impl SessionRepository for MemoryAccounts {
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = Session {
            id: sessions.iter().map(|s| s.id).max().unwrap_or(0) + 1,
            user_id: new_session.user_id,
            token_hash: new_session.token_hash,
            created_at: Utc::now(),
            expires_at: new_session.expires_at,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AppError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.token_hash != token_hash);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<Vec<i64>, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        let now = Utc::now();
        let expired = sessions
            .iter()
            .filter(|s| s.is_expired_at(now))
            .map(|s| s.id)
            .collect();
        sessions.retain(|s| !s.is_expired_at(now));
        Ok(expired)
    }
}

/// Renderer that always fails, for the print error paths.
pub struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(&self, _document: &DocumentTree) -> Result<RenderedDocument, AppError> {
        Err(AppError::render("template failed", json!({})))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub accounts: Arc<MemoryAccounts>,
    pub auth: Arc<AuthService>,
}

impl TestApp {
    /// Logs the administrator in and returns a fresh session token.
    pub async fn login(&self) -> String {
        self.auth
            .login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap()
            .unwrap()
            .token
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    pub fn cookie(token: &str) -> String {
        format!("session_token={token}")
    }
}

pub struct TestAppBuilder {
    renderer: Arc<dyn DocumentRenderer>,
    layout: LabelLayout,
    read_only: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            renderer: Arc::new(HtmlDocumentRenderer::new()),
            layout: LabelLayout::default(),
            read_only: false,
        }
    }
}

impl TestAppBuilder {
    pub fn renderer(mut self, renderer: impl DocumentRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn layout(mut self, layout: LabelLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub async fn build(self) -> TestApp {
        let store = Arc::new(MemoryStore::default());
        let accounts = Arc::new(MemoryAccounts::default());

        let password_hash = AuthService::hash_password(ADMIN_PASSWORD).unwrap();
        UserRepository::create(accounts.as_ref(), ADMIN_EMAIL, &password_hash)
            .await
            .unwrap();

        let drafts = Arc::new(ReorderDrafts::new());
        let auth = Arc::new(
            AuthService::new(
                accounts.clone(),
                accounts.clone(),
                "test-signing-secret".to_string(),
                60,
            )
            .with_reorder_drafts(drafts.clone()),
        );

        let state = AppState::new(
            auth.clone(),
            RecordStore {
                buildings: store.clone(),
                residents: store.clone(),
                read_only: self.read_only,
            },
            self.renderer,
            self.layout,
            SessionSettings {
                ttl_seconds: 3600,
                secure_cookies: false,
            },
            drafts,
        );

        TestApp {
            server: TestServer::new(router(state)).unwrap(),
            store,
            accounts,
            auth,
        }
    }
}

pub async fn test_app() -> TestApp {
    TestAppBuilder::default().build().await
}
