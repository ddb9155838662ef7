//! # Session Id Services
//!
//! Decorators layered over transport session configs.
//!
//! - **EncodedSessionConfig**: routing-aware encode/decode with duplicate-cookie recovery

pub mod decorator;

pub use decorator::EncodedSessionConfig;
