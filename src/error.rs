//! # Error Types
//!
//! Error handling for session identifier decoration.
//!
//! This module defines the error variants raised by the decorator and its
//! collaborators: codecs, session directories and configuration.
//!
//! ## Error Categories
//! - **Codec Errors**: Encoded identifiers that cannot be decoded or encoded
//! - **Directory Errors**: Session lookups that fail (as opposed to "not found")
//! - **Configuration Errors**: Invalid or unreadable configuration
//!
//! An identifier that cannot be resolved is *not* an error. Resolution returns
//! `Ok(None)` in that case and callers treat the request as sessionless.
//!
//! ## Example Usage
//! ```rust
//! use routed_session::core::codec::{RouteCodec, SessionIdCodec};
//! use routed_session::error::{Result, SessionError};
//!
//! fn plain_id(codec: &RouteCodec, wire: &str) -> Result<String> {
//!     codec.decode(wire)
//! }
//!
//! let codec = RouteCodec::new(Some("node-1".to_string()));
//! assert_eq!(plain_id(&codec, "abc.node-1").unwrap(), "abc");
//! assert!(matches!(plain_id(&codec, ""), Err(SessionError::InvalidSessionId(_))));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Codec errors
    pub const ERR_EMPTY_SESSION_ID: &str = "Session identifier is empty";
    pub const ERR_EMPTY_PLAIN_ID: &str = "Cannot encode an empty session identifier";
    pub const ERR_DELIMITER_IN_ROUTE: &str = "Route must not contain the route delimiter";

    pub const ERR_ROUTE_READ_LOCK: &str = "Failed to acquire read lock on route";
    pub const ERR_ROUTE_WRITE_LOCK: &str = "Failed to acquire write lock on route";

    /// Registry errors
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on session registry";
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on session registry";
}

/// SessionError is the primary error type for all session identifier operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid session identifier: {0}")]
    InvalidSessionId(String),

    #[error("Codec error: {0}")]
    CodecError(String),

    #[error("Session directory error: {0}")]
    DirectoryError(String),
}

/// Type alias for Results using SessionError
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SessionError::InvalidSessionId(constants::ERR_EMPTY_SESSION_ID.to_string());
        assert_eq!(
            err.to_string(),
            "Invalid session identifier: Session identifier is empty"
        );

        let err = SessionError::DirectoryError(constants::ERR_REGISTRY_READ_LOCK.to_string());
        assert_eq!(
            err.to_string(),
            "Session directory error: Failed to acquire read lock on session registry"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SessionError = io_err.into();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
