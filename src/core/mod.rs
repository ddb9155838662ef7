//! # Core Session Components
//!
//! Collaborator interfaces and request-scoped types shared by the decorator
//! and the transports.
//!
//! ## Components
//! - **SessionConfig**: get/set/clear of the identifier against a transport
//! - **SessionIdCodec**: plain <-> encoded identifier transform
//! - **SessionDirectory**: lookup of active sessions by plain identifier
//! - **Exchange**: per-request cookies, duplicate reports and decorator state
//!
//! ## Identifier Forms
//! ```text
//! plain:    Zx81kQ          (application, session store)
//! encoded:  Zx81kQ.node-2   (wire, carries routing metadata)
//! ```

pub mod codec;
pub mod directory;
pub mod exchange;
pub mod session_config;
