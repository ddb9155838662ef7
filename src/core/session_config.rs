//! # Session Config
//!
//! The single capability interface for reading and writing the session
//! identifier against a transport. Transports implement it directly; the
//! encoding decorator implements it by composing an inner instance.

use crate::core::exchange::Exchange;
use crate::error::Result;

/// Where the session identifier of a request was carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCookieSource {
    /// Path parameter rewritten into the URL
    Url,
    /// HTTP cookie
    Cookie,
    /// TLS session
    Ssl,
    /// Some other mechanism
    Other,
    /// No identifier present
    None,
}

/// Raw get/set/clear of the session identifier for one exchange
pub trait SessionConfig: Send + Sync {
    /// Identifier carried by the request, if any
    fn find_session_id(&self, exchange: &mut Exchange) -> Result<Option<String>>;

    /// Attach `session_id` to the response
    fn set_session_id(&self, exchange: &mut Exchange, session_id: &str) -> Result<()>;

    /// Instruct the client to discard `session_id`
    fn clear_session(&self, exchange: &mut Exchange, session_id: &str) -> Result<()>;

    fn session_cookie_source(&self, exchange: &Exchange) -> SessionCookieSource;

    /// Rewrite `original_url` so that it carries `session_id`
    fn rewrite_url(&self, original_url: &str, session_id: &str) -> Result<String>;
}

impl<T: SessionConfig + ?Sized> SessionConfig for Box<T> {
    fn find_session_id(&self, exchange: &mut Exchange) -> Result<Option<String>> {
        (**self).find_session_id(exchange)
    }

    fn set_session_id(&self, exchange: &mut Exchange, session_id: &str) -> Result<()> {
        (**self).set_session_id(exchange, session_id)
    }

    fn clear_session(&self, exchange: &mut Exchange, session_id: &str) -> Result<()> {
        (**self).clear_session(exchange, session_id)
    }

    fn session_cookie_source(&self, exchange: &Exchange) -> SessionCookieSource {
        (**self).session_cookie_source(exchange)
    }

    fn rewrite_url(&self, original_url: &str, session_id: &str) -> Result<String> {
        (**self).rewrite_url(original_url, session_id)
    }
}
