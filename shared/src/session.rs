/// In-memory session registry.
///
/// Sessions exist only for the lifetime of the process; there is no
/// persistence layer behind this store. Logout or expiry removes a session
/// together with its queued URLs. Each session is independent and nothing
/// is shared between them.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Session, Tier};

/// Thread-safe store mapping session id to session state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Session>>>,
    ttl_secs: i64,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl_secs,
        }
    }

    /// Create a session for an authenticated user and return it.
    pub async fn create(&self, email: &str, tier: Tier) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            tier,
            pending_urls: Vec::new(),
            created_at: now,
            expires_at: now + Duration::seconds(self.ttl_secs),
        };
        self.inner
            .lock()
            .await
            .insert(session.id.clone(), session.clone());
        info!("Session {} created for {} ({})", session.id, email, tier);
        session
    }

    /// Fetch a live session. Expired entries read as absent.
    pub async fn get(&self, id: &str) -> Option<Session> {
        let map = self.inner.lock().await;
        map.get(id)
            .filter(|s| s.expires_at > Utc::now())
            .cloned()
    }

    /// Remove the session and drop its queue. Returns whether it existed.
    pub async fn logout(&self, id: &str) -> bool {
        let removed = self.inner.lock().await.remove(id);
        if let Some(s) = &removed {
            info!("Session {} logged out ({} queued URLs dropped)", id, s.pending_urls.len());
        }
        removed.is_some()
    }

    /// Split a newline-separated block, trim each line, and queue the
    /// non-empty ones in order. Returns how many were appended, or None if
    /// the session is gone.
    pub async fn enqueue_urls(&self, id: &str, block: &str) -> Option<usize> {
        let mut map = self.inner.lock().await;
        let session = map.get_mut(id).filter(|s| s.expires_at > Utc::now())?;

        let urls: Vec<String> = block
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        let added = urls.len();
        session.pending_urls.extend(urls);

        debug!("Session {}: {} URLs queued ({} total)", id, added, session.pending_urls.len());
        Some(added)
    }

    /// Snapshot of the pending queue.
    pub async fn pending_urls(&self, id: &str) -> Option<Vec<String>> {
        let map = self.inner.lock().await;
        map.get(id)
            .filter(|s| s.expires_at > Utc::now())
            .map(|s| s.pending_urls.clone())
    }

    /// Take and clear the queue in one step, so a drain can never be
    /// processed twice.
    pub async fn drain_queue(&self, id: &str) -> Option<Vec<String>> {
        let mut map = self.inner.lock().await;
        let session = map.get_mut(id).filter(|s| s.expires_at > Utc::now())?;
        Some(std::mem::take(&mut session.pending_urls))
    }

    /// Remove expired sessions; returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, s| s.expires_at > now);
        let removed = before - map.len();
        if removed > 0 {
            debug!("Cleaned up {} expired sessions", removed);
        }
        removed
    }

    /// Number of live sessions (expired-but-unswept entries included).
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
