//! # Session Stores
//!
//! Session directory implementations.
//!
//! - **Registry**: in-memory, TTL and capacity bounded

pub mod registry;

pub use registry::{SessionRegistry, SessionRegistryStats};
