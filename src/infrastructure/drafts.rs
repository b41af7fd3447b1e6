//! In-memory store of reorder working copies.
//!
//! One [`ReorderSession`] per login session, building and apartment. Drafts only
//! exist while editing or saving; a finished or cancelled reorder is removed.
//! The lock is never held across record store I/O.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::reorder::ReorderSession;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey {
    pub session_id: i64,
    pub building_id: i64,
    pub apartment_number: String,
}

impl DraftKey {
    pub fn new(session_id: i64, building_id: i64, apartment_number: impl Into<String>) -> Self {
        Self {
            session_id,
            building_id,
            apartment_number: apartment_number.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ReorderDrafts {
    drafts: Mutex<HashMap<DraftKey, ReorderSession>>,
}

impl ReorderDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &DraftKey) -> Option<ReorderSession> {
        self.drafts.lock().await.get(key).cloned()
    }

    /// Stores `session` unless a draft already exists; returns whether it was stored.
    pub async fn insert_new(&self, key: DraftKey, session: ReorderSession) -> bool {
        let mut drafts = self.drafts.lock().await;
        if drafts.contains_key(&key) {
            return false;
        }
        drafts.insert(key, session);
        true
    }

    /// Runs `f` on the draft, if there is one.
    pub async fn update<T>(
        &self,
        key: &DraftKey,
        f: impl FnOnce(&mut ReorderSession) -> T,
    ) -> Option<T> {
        self.drafts.lock().await.get_mut(key).map(f)
    }

    pub async fn remove(&self, key: &DraftKey) -> Option<ReorderSession> {
        self.drafts.lock().await.remove(key)
    }

    /// Drops every draft of a login session. Returns how many were dropped.
    pub async fn remove_session(&self, session_id: i64) -> usize {
        let mut drafts = self.drafts.lock().await;
        let before = drafts.len();
        drafts.retain(|key, _| key.session_id != session_id);
        before - drafts.len()
    }

    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.lock().await.is_empty()
    }
}
