//! Session-scoped result storage.
//!
//! Each session keeps the last single-document result and the last batch so
//! they can be re-read and exported. Nothing here outlives the process.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::aggregator::BatchResult;
use crate::analysis::interpreter::AnalysisResult;

/// A single-document result together with the uploaded filename.
#[derive(Debug, Clone)]
pub struct StoredResult {
    pub filename: String,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub last_result: Option<StoredResult>,
    pub last_batch: Option<BatchResult>,
    pub last_active: DateTime<Utc>,
}

impl SessionContext {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_result: None,
            last_batch: None,
            last_active: now,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        prune_idle(&mut sessions, now, self.ttl);
        sessions.insert(id, SessionContext::new(now));
        debug!("{} active sessions", sessions.len());
        id
    }

    /// Snapshot of a live session, or `None` if unknown or expired.
    pub async fn get(&self, id: Uuid) -> Option<SessionContext> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        prune_idle(&mut sessions, now, self.ttl);
        let session = sessions.get_mut(&id)?;
        session.last_active = now;
        Some(session.clone())
    }

    pub async fn exists(&self, id: Uuid) -> bool {
        self.get(id).await.is_some()
    }

    /// Replaces the session's last single-document result. Returns `false`
    /// if the session is unknown or expired.
    pub async fn store_result(&self, id: Uuid, stored: StoredResult) -> bool {
        self.update(id, |session| session.last_result = Some(stored)).await
    }

    /// Replaces the session's last batch.
    pub async fn store_batch(&self, id: Uuid, batch: BatchResult) -> bool {
        self.update(id, |session| session.last_batch = Some(batch)).await
    }

    async fn update(&self, id: Uuid, apply: impl FnOnce(&mut SessionContext)) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        prune_idle(&mut sessions, now, self.ttl);
        match sessions.get_mut(&id) {
            Some(session) => {
                apply(session);
                session.last_active = now;
                true
            }
            None => false,
        }
    }
}

fn prune_idle(sessions: &mut HashMap<Uuid, SessionContext>, now: DateTime<Utc>, ttl: Duration) {
    let before = sessions.len();
    sessions.retain(|_, s| now - s.last_active <= ttl);
    let removed = before - sessions.len();
    if removed > 0 {
        debug!("Pruned {removed} idle sessions");
    }
}
