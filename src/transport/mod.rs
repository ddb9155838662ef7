//! # Transports
//!
//! [`SessionConfig`](crate::core::session_config::SessionConfig)
//! implementations that read and write the identifier on the exchange.
//!
//! - **Cookie**: HTTP cookie, the default
//! - **Path parameter**: `;jsessionid=` URL rewriting for cookieless clients

pub mod cookie;
pub mod path_parameter;

pub use cookie::CookieSessionConfig;
pub use path_parameter::PathParameterSessionConfig;
