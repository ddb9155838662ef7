//! # In-Memory Session Registry
//!
//! A [`SessionDirectory`] backed by a process-local map of active sessions.
//!
//! ## Features
//! - **Thread-safe**: `Arc<RwLock<>>`, lookups only take the read lock
//! - **TTL-based expiration**: sessions older than the TTL are invisible to lookups
//! - **Memory-bounded**: the oldest session is evicted once capacity is exceeded
//!
//! ## Usage
//! ```rust
//! use routed_session::core::directory::SessionDirectory;
//! use routed_session::store::registry::SessionRegistry;
//! use std::time::Duration;
//!
//! let registry = SessionRegistry::new(1000, Duration::from_secs(1800));
//! registry.register("Zx81kQ").unwrap();
//! assert!(registry.lookup("Zx81kQ").unwrap().is_some());
//! assert!(registry.lookup("missing").unwrap().is_none());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::DirectorySettings;
use crate::core::directory::{Session, SessionDirectory};
use crate::error::{constants, Result, SessionError};

#[derive(Clone, Debug)]
struct RegistryEntry {
    session: Session,
    ttl: Duration,
}

impl RegistryEntry {
    fn is_expired(&self) -> bool {
        match self.session.created_at.elapsed() {
            Ok(elapsed) => elapsed > self.ttl,
            Err(_) => true, // System time went backward, treat as expired
        }
    }
}

/// Thread-safe in-memory session directory
#[derive(Clone)]
pub struct SessionRegistry {
    max_entries: usize,
    default_ttl: Duration,
    inner: Arc<RwLock<RegistryInner>>,
}

struct RegistryInner {
    sessions: HashMap<String, RegistryEntry>,
    total_inserts: u64,
}

impl SessionRegistry {
    /// Create a registry holding at most `max_entries` sessions, each alive for `default_ttl`
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            max_entries,
            default_ttl,
            inner: Arc::new(RwLock::new(RegistryInner {
                sessions: HashMap::with_capacity(max_entries.min(4096)),
                total_inserts: 0,
            })),
        }
    }

    pub fn from_config(settings: &DirectorySettings) -> Self {
        Self::new(settings.max_entries, settings.session_ttl)
    }

    /// Register an active session under its plain identifier
    pub fn register<S: Into<String>>(&self, session_id: S) -> Result<Session> {
        let mut inner = self.inner.write().map_err(|_| {
            SessionError::DirectoryError(constants::ERR_REGISTRY_WRITE_LOCK.to_string())
        })?;

        let session = Session::new(session_id);
        let entry = RegistryEntry {
            session: session.clone(),
            ttl: self.default_ttl,
        };

        // Clean expired entries before checking capacity
        Self::evict_expired(&mut inner);

        inner.sessions.insert(session.id.clone(), entry);
        inner.total_inserts += 1;

        if inner.sessions.len() > self.max_entries {
            Self::evict_oldest(&mut inner);
        }

        trace!(session_count = inner.sessions.len(), "Session registered");
        Ok(session)
    }

    /// Remove a session, returning it if it was present
    pub fn invalidate(&self, session_id: &str) -> Result<Option<Session>> {
        let mut inner = self.inner.write().map_err(|_| {
            SessionError::DirectoryError(constants::ERR_REGISTRY_WRITE_LOCK.to_string())
        })?;
        Ok(inner.sessions.remove(session_id).map(|e| e.session))
    }

    /// Drop every session
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| {
            SessionError::DirectoryError(constants::ERR_REGISTRY_WRITE_LOCK.to_string())
        })?;
        let count = inner.sessions.len();
        inner.sessions.clear();
        debug!(cleared_count = count, "Session registry cleared");
        Ok(())
    }

    pub fn stats(&self) -> Result<SessionRegistryStats> {
        let inner = self.inner.read().map_err(|_| {
            SessionError::DirectoryError(constants::ERR_REGISTRY_READ_LOCK.to_string())
        })?;

        let expired_count = inner.sessions.values().filter(|e| e.is_expired()).count();

        Ok(SessionRegistryStats {
            total_entries: inner.sessions.len(),
            max_entries: self.max_entries,
            expired_count,
            total_inserts: inner.total_inserts,
        })
    }

    fn evict_expired(inner: &mut RegistryInner) {
        let before = inner.sessions.len();
        inner.sessions.retain(|_, entry| !entry.is_expired());
        let after = inner.sessions.len();

        if before != after {
            debug!(
                removed_count = before - after,
                remaining_count = after,
                "Expired sessions evicted"
            );
        }
    }

    fn evict_oldest(inner: &mut RegistryInner) {
        if let Some(oldest_key) = inner
            .sessions
            .iter()
            .min_by_key(|(_, entry)| entry.session.created_at)
            .map(|(k, _)| k.clone())
        {
            inner.sessions.remove(&oldest_key);
            debug!("Oldest session evicted to make room");
        }
    }
}

impl SessionDirectory for SessionRegistry {
    fn lookup(&self, session_id: &str) -> Result<Option<Session>> {
        let inner = self.inner.read().map_err(|_| {
            SessionError::DirectoryError(constants::ERR_REGISTRY_READ_LOCK.to_string())
        })?;

        match inner.sessions.get(session_id) {
            Some(entry) if !entry.is_expired() => {
                trace!("Session registry hit");
                Ok(Some(entry.session.clone()))
            }
            _ => {
                trace!("Session registry miss or expired");
                Ok(None)
            }
        }
    }
}

/// Statistics about the session registry
#[derive(Debug, Clone, Copy)]
pub struct SessionRegistryStats {
    /// Sessions currently held, including expired ones not yet evicted
    pub total_entries: usize,
    pub max_entries: usize,
    pub expired_count: usize,
    /// Total sessions ever registered
    pub total_inserts: u64,
}
