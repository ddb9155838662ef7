//! # Session Directory
//!
//! Lookup of active sessions by plain identifier. The decorator only needs to
//! know whether a session exists; "not found" is `Ok(None)` and is never an
//! error. Implementations return `Err` only when the lookup itself fails.

use std::sync::Arc;
use std::time::SystemTime;

use crate::error::Result;

/// An active session as reported by a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub created_at: SystemTime,
}

impl Session {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            created_at: SystemTime::now(),
        }
    }
}

/// Lookup-by-id against the active session store
pub trait SessionDirectory: Send + Sync {
    fn lookup(&self, session_id: &str) -> Result<Option<Session>>;
}

impl<T: SessionDirectory + ?Sized> SessionDirectory for Arc<T> {
    fn lookup(&self, session_id: &str) -> Result<Option<Session>> {
        (**self).lookup(session_id)
    }
}
