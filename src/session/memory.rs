//! In-memory session store
//!
//! A single mutex guards the whole map. Expired entries are dropped lazily
//! by `check` and in bulk by a periodic sweep.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, trace};

use super::{Session, SessionStore};
use crate::config::SessionConfig;
use crate::errors::Result;
use crate::utils::generate_random_code;

/// 会话 ID 长度
pub const SESSION_ID_LENGTH: usize = 22;

struct SessionEntry {
    session: Session,
    expires: Instant,
}

pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Build a store from configuration and start its background sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &SessionConfig) -> Arc<Self> {
        let store = Arc::new(Self::new(config.ttl()));
        store.spawn_sweeper(config.sweep_interval());
        store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn create_session(&self, session: Session) -> String {
        let id = generate_random_code(SESSION_ID_LENGTH);
        let expires = Instant::now() + self.ttl;

        self.entries
            .lock()
            .insert(id.clone(), SessionEntry { session, expires });

        trace!("Session created");
        id
    }

    pub fn check_session(&self, id: &str) -> Option<Session> {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        let entry = entries.get_mut(id)?;
        if entry.expires > now {
            entry.expires = now + self.ttl;
            return Some(entry.session.clone());
        }

        entries.remove(id);
        trace!("Session expired on check");
        None
    }

    /// Remove every expired session. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires > now);
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Session sweep removed {} expired sessions", removed);
        }
        removed
    }

    /// Spawn the periodic sweep. The task holds a weak reference and stops
    /// once the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        // 首次触发时间从创建时刻算起，而不是任务首次被调度时
        let start = Instant::now() + every;

        tokio::spawn(async move {
            let mut ticker = interval_at(start, every);
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    debug!("Session store dropped, stopping sweeper");
                    break;
                };
                store.sweep_expired();
            }
        })
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> Result<String> {
        Ok(self.create_session(session))
    }

    async fn check(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.check_session(id))
    }
}
