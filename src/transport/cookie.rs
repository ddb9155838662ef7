//! # Cookie Session Config
//!
//! Carries the session identifier in an HTTP cookie.
//!
//! Reads prefer a cookie written earlier in the same request over the inbound
//! request cookie, so an identifier assigned during the request is visible to
//! later lookups. A cookie discarded during the request reads as absent.

use tracing::trace;

use crate::config::CookieSettings;
use crate::core::exchange::{Cookie, Exchange};
use crate::core::session_config::{SessionConfig, SessionCookieSource};
use crate::error::Result;

/// Session config backed by a named cookie
#[derive(Debug, Clone)]
pub struct CookieSessionConfig {
    name: String,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    max_age: Option<u64>,
}

impl CookieSessionConfig {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            path: Some(String::from("/")),
            domain: None,
            secure: false,
            http_only: true,
            max_age: None,
        }
    }

    pub fn from_config(settings: &CookieSettings) -> Self {
        Self {
            name: settings.name.clone(),
            path: settings.path.clone(),
            domain: settings.domain.clone(),
            secure: settings.secure,
            http_only: settings.http_only,
            max_age: settings.max_age,
        }
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    fn build_cookie(&self, value: &str) -> Cookie {
        let mut cookie = Cookie::new(self.name.as_str(), value)
            .with_secure(self.secure)
            .with_http_only(self.http_only);
        cookie.path = self.path.clone();
        cookie.domain = self.domain.clone();
        cookie.max_age = self.max_age;
        cookie
    }
}

impl SessionConfig for CookieSessionConfig {
    fn find_session_id(&self, exchange: &mut Exchange) -> Result<Option<String>> {
        if let Some(cookie) = exchange.response_cookie(&self.name) {
            if cookie.is_discarded() {
                return Ok(None);
            }
            return Ok(Some(cookie.value.clone()));
        }

        Ok(exchange
            .request_cookie(&self.name)
            .map(|c| c.value.clone())
            .filter(|v| !v.is_empty()))
    }

    fn set_session_id(&self, exchange: &mut Exchange, session_id: &str) -> Result<()> {
        trace!(cookie = %self.name, "Setting session cookie");
        exchange.set_response_cookie(self.build_cookie(session_id));
        Ok(())
    }

    fn clear_session(&self, exchange: &mut Exchange, session_id: &str) -> Result<()> {
        trace!(cookie = %self.name, "Discarding session cookie");
        exchange.set_response_cookie(self.build_cookie(session_id).with_max_age(0));
        Ok(())
    }

    fn session_cookie_source(&self, _exchange: &Exchange) -> SessionCookieSource {
        SessionCookieSource::Cookie
    }

    fn rewrite_url(&self, original_url: &str, _session_id: &str) -> Result<String> {
        Ok(original_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_reads_request_cookie() {
        let config = CookieSessionConfig::new("JSESSIONID");
        let mut exchange = Exchange::from_cookie_header("JSESSIONID=abc.node1");
        assert_eq!(
            config.find_session_id(&mut exchange).unwrap().as_deref(),
            Some("abc.node1")
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_set_then_find_returns_new_value() {
        let config = CookieSessionConfig::new("JSESSIONID");
        let mut exchange = Exchange::from_cookie_header("JSESSIONID=old");

        config.set_session_id(&mut exchange, "new").unwrap();

        assert_eq!(
            config.find_session_id(&mut exchange).unwrap().as_deref(),
            Some("new")
        );
        assert_eq!(
            exchange.set_cookie_headers(),
            vec!["JSESSIONID=new; Path=/; HttpOnly".to_string()]
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_clear_discards_cookie() {
        let config = CookieSessionConfig::new("JSESSIONID");
        let mut exchange = Exchange::from_cookie_header("JSESSIONID=abc");

        config.clear_session(&mut exchange, "abc").unwrap();

        assert!(config.find_session_id(&mut exchange).unwrap().is_none());
        assert!(exchange
            .response_cookie("JSESSIONID")
            .map(Cookie::is_discarded)
            .unwrap_or(false));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_missing_or_empty_cookie() {
        let config = CookieSessionConfig::new("JSESSIONID");
        let mut exchange = Exchange::from_cookie_header("other=1; JSESSIONID=");
        assert!(config.find_session_id(&mut exchange).unwrap().is_none());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_url_untouched() {
        let config = CookieSessionConfig::new("JSESSIONID");
        assert_eq!(config.rewrite_url("/cart?x=1", "abc").unwrap(), "/cart?x=1");
        assert_eq!(
            config.session_cookie_source(&Exchange::new()),
            SessionCookieSource::Cookie
        );
    }
}
