//! Authenticated sessions
//!
//! Sessions are ephemeral: they live only in memory and expire after a
//! period of inactivity.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use memory::{MemorySessionStore, SESSION_ID_LENGTH};

/// Session payload. The session ID is the map key, not part of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
}

impl Session {
    pub fn new<T: Into<String>>(username: T) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `session` and return its new ID.
    async fn create(&self, session: Session) -> Result<String>;

    /// Return the session for `id` and extend its lifetime, or `None` if it
    /// does not exist or has expired.
    async fn check(&self, id: &str) -> Result<Option<Session>>;
}
