//! # Path Parameter Session Config
//!
//! Carries the session identifier as a URL path parameter, e.g.
//! `/shop/cart;jsessionid=Zx81kQ.node-2?item=7`. Used for clients that refuse
//! cookies. Nothing is written to the response; links are rewritten instead.

use crate::config::CookieSettings;
use crate::core::exchange::Exchange;
use crate::core::session_config::{SessionConfig, SessionCookieSource};
use crate::error::Result;

/// Session config backed by a `;name=value` path parameter
#[derive(Debug, Clone)]
pub struct PathParameterSessionConfig {
    name: String,
}

impl PathParameterSessionConfig {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn from_config(settings: &CookieSettings) -> Self {
        Self::new(settings.path_parameter.as_str())
    }

    pub fn parameter_name(&self) -> &str {
        &self.name
    }
}

impl SessionConfig for PathParameterSessionConfig {
    fn find_session_id(&self, exchange: &mut Exchange) -> Result<Option<String>> {
        Ok(exchange
            .path_parameter(&self.name)
            .filter(|v| !v.is_empty())
            .map(str::to_string))
    }

    fn set_session_id(&self, _exchange: &mut Exchange, _session_id: &str) -> Result<()> {
        Ok(())
    }

    fn clear_session(&self, _exchange: &mut Exchange, _session_id: &str) -> Result<()> {
        Ok(())
    }

    fn session_cookie_source(&self, exchange: &Exchange) -> SessionCookieSource {
        match exchange.path_parameter(&self.name) {
            Some(v) if !v.is_empty() => SessionCookieSource::Url,
            _ => SessionCookieSource::None,
        }
    }

    fn rewrite_url(&self, original_url: &str, session_id: &str) -> Result<String> {
        let split = original_url.find(['?', '#']).unwrap_or(original_url.len());
        let (path, suffix) = original_url.split_at(split);

        let marker = format!(";{}=", self.name);
        let path = match path.find(&marker) {
            Some(start) => {
                let rest = &path[start + marker.len()..];
                let end = rest.find([';', '/']).unwrap_or(rest.len());
                format!("{}{}", &path[..start], &rest[end..])
            }
            None => path.to_string(),
        };

        Ok(format!("{path}{marker}{session_id}{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_rewrite_plain_path() {
        let config = PathParameterSessionConfig::new("jsessionid");
        assert_eq!(
            config.rewrite_url("/shop/cart", "abc.n1").unwrap(),
            "/shop/cart;jsessionid=abc.n1"
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_rewrite_keeps_query_and_fragment() {
        let config = PathParameterSessionConfig::new("jsessionid");
        assert_eq!(
            config.rewrite_url("/cart?item=7#top", "abc").unwrap(),
            "/cart;jsessionid=abc?item=7#top"
        );
        assert_eq!(
            config.rewrite_url("/cart#top", "abc").unwrap(),
            "/cart;jsessionid=abc#top"
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_rewrite_replaces_existing_parameter() {
        let config = PathParameterSessionConfig::new("jsessionid");
        assert_eq!(
            config
                .rewrite_url("/cart;jsessionid=old.n1?x=1", "new.n2")
                .unwrap(),
            "/cart;jsessionid=new.n2?x=1"
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_find_and_source() {
        let config = PathParameterSessionConfig::new("jsessionid");

        let mut with_id = Exchange::new().with_path_parameter("jsessionid", "abc.n1");
        assert_eq!(
            config.find_session_id(&mut with_id).unwrap().as_deref(),
            Some("abc.n1")
        );
        assert_eq!(
            config.session_cookie_source(&with_id),
            SessionCookieSource::Url
        );

        let mut without = Exchange::new();
        assert!(config.find_session_id(&mut without).unwrap().is_none());
        assert_eq!(
            config.session_cookie_source(&without),
            SessionCookieSource::None
        );
    }
}
