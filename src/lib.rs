//! # routed-session
//!
//! Route-aware session identifier decoration for clustered HTTP server tiers.
//!
//! The identifier a client carries on the wire embeds routing metadata (which
//! backend node owns the session), while the request handler, the session
//! store and application code only ever see the plain identifier. The
//! [`EncodedSessionConfig`] decorator sits between the transport and the rest
//! of the server and:
//!
//! - encodes identifiers on every outbound path (cookie, URL rewrite, clear),
//! - decodes them on the inbound path,
//! - refreshes the wire form when routing changes (e.g. after failover),
//! - recovers the live session when a client sends duplicate session cookies.
//!
//! ## Quick Start
//! ```rust
//! use std::sync::Arc;
//! use routed_session::config::SessionTierConfig;
//! use routed_session::core::codec::RouteCodec;
//! use routed_session::core::exchange::Exchange;
//! use routed_session::core::session_config::SessionConfig;
//! use routed_session::store::SessionRegistry;
//! use routed_session::transport::CookieSessionConfig;
//! use routed_session::EncodedSessionConfig;
//!
//! let config = SessionTierConfig::default_with_overrides(|c| {
//!     c.routing.route = Some("node-1".to_string());
//! });
//! let registry = Arc::new(SessionRegistry::from_config(&config.directory));
//! registry.register("Zx81kQ").unwrap();
//!
//! let decorator = EncodedSessionConfig::from_config(
//!     CookieSessionConfig::from_config(&config.cookie),
//!     RouteCodec::from_config(&config.routing).unwrap(),
//!     Some(registry),
//!     &config,
//! );
//!
//! // The browser sent a stale cookie first and the live one second
//! let header = "JSESSIONID=old.node-3; JSESSIONID=Zx81kQ.node-1";
//! let mut exchange = Exchange::from_cookie_header(header);
//! let session_id = decorator.find_session_id(&mut exchange).unwrap();
//! assert_eq!(session_id.as_deref(), Some("Zx81kQ"));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod store;
pub mod transport;
pub mod utils;

pub use crate::core::codec::{IdentityCodec, RouteCodec, SessionIdCodec};
pub use crate::core::directory::{Session, SessionDirectory};
pub use crate::core::exchange::{Cookie, Exchange, RequestState};
pub use crate::core::session_config::{SessionConfig, SessionCookieSource};
pub use error::{Result, SessionError};
pub use service::EncodedSessionConfig;
