//! Per-session isolation
//!
//! Every interactive session owns its own [`SessionLog`]. A check holds the
//! session's log lock for its whole duration, so one session has at most one
//! check in flight while other sessions proceed independently.

use crate::session_log::SessionLog;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// One interactive session
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Milliseconds since the epoch of the last access
    last_active_ms: AtomicI64,
    log: Mutex<SessionLog>,
}

impl Session {
    fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
            log: Mutex::new(SessionLog::new()),
        }
    }

    pub fn log(&self) -> &Mutex<SessionLog> {
        &self.log
    }

    pub fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_active_ms(&self) -> i64 {
        self.last_active_ms.load(Ordering::Relaxed)
    }
}

/// Registry of live sessions keyed by session id
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(idle_timeout: std::time::Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout: Duration::from_std(idle_timeout).unwrap_or_else(|_| Duration::days(36500)),
            max_sessions,
        }
    }

    /// Start a new session
    ///
    /// Idle sessions are reaped first. Returns `None` when the registry is
    /// still at capacity afterwards.
    pub async fn create(&self) -> Option<Uuid> {
        self.reap_idle(Utc::now()).await;

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            debug!(active = sessions.len(), "Session limit reached");
            return None;
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Arc::new(Session::new(id, Utc::now())));
        info!(session_id = %id, active = sessions.len(), "Session started");
        Some(id)
    }

    /// Look up a session and mark it active
    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        session.touch();
        Some(session)
    }

    /// End a session and discard its log
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        if let Some(session) = &removed {
            let rows = session.log.lock().await.len();
            info!(session_id = %id, rows = rows, "Session ended");
        }
        removed.is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle since before `now - idle_timeout`
    pub async fn reap_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now
            .checked_sub_signed(self.idle_timeout)
            .map(|t| t.timestamp_millis())
            .unwrap_or(i64::MIN);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active_ms() >= cutoff);
        let reaped = before - sessions.len();

        if reaped > 0 {
            info!(reaped = reaped, active = sessions.len(), "Reaped idle sessions");
        }
        reaped
    }
}
