//! # Request Exchange
//!
//! Request-scoped context handed through every session config call.
//!
//! The exchange carries what the transport observed on the inbound request
//! (cookies in header order, duplicate-cookie reports, path parameters), what
//! has been written back during this request (response cookies) and the
//! per-request [`RequestState`] owned by the decorator. An exchange lives for
//! exactly one request; dropping it discards all of that state.
//!
//! ## Duplicate cookies
//! Some browsers and proxies send several cookies with the same name when
//! domain/path scopes overlap. The first occurrence is the primary value
//! returned by [`Exchange::request_cookie`]. Every occurrence of a repeated
//! name is also reported, in header order, by [`Exchange::duplicate_cookies`].

use std::collections::HashMap;

/// A single cookie as seen on a request or written to a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    /// `Some(0)` marks a cookie being discarded
    pub max_age: Option<u64>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Whether this cookie instructs the client to drop it
    pub fn is_discarded(&self) -> bool {
        self.max_age == Some(0)
    }

    /// Render as a `Set-Cookie` header value
    pub fn to_set_cookie_header(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);
        if let Some(ref path) = self.path {
            header.push_str("; Path=");
            header.push_str(path);
        }
        if let Some(ref domain) = self.domain {
            header.push_str("; Domain=");
            header.push_str(domain);
        }
        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={max_age}"));
            if max_age == 0 {
                header.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
            }
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        header
    }
}

/// Mutable state scoped to a single request and owned by the session id decorator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestState {
    session_id_set: bool,
}

impl RequestState {
    /// Whether a session id was explicitly assigned during this request
    pub fn is_session_id_set(&self) -> bool {
        self.session_id_set
    }

    pub(crate) fn mark_session_id_set(&mut self) {
        self.session_id_set = true;
    }
}

/// Request/response context for one request
#[derive(Debug, Default)]
pub struct Exchange {
    request_cookies: Vec<Cookie>,
    duplicate_cookies: HashMap<String, Vec<Cookie>>,
    path_parameters: HashMap<String, String>,
    response_cookies: Vec<Cookie>,
    state: RequestState,
}

impl Exchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an exchange from a raw `Cookie` request header value
    ///
    /// Pairs are split on `;`, names and values are trimmed and surrounding
    /// double quotes are stripped from values. Empty names and `$`-prefixed
    /// attributes are ignored.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut exchange = Self::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() || name.starts_with('$') {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            exchange.add_request_cookie(Cookie::new(name, value));
        }
        exchange
    }

    /// Add an inbound cookie, recording a duplicate report when the name repeats
    pub fn with_request_cookie(mut self, cookie: Cookie) -> Self {
        self.add_request_cookie(cookie);
        self
    }

    pub fn with_path_parameter<N: Into<String>, V: Into<String>>(
        mut self,
        name: N,
        value: V,
    ) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    fn add_request_cookie(&mut self, cookie: Cookie) {
        if let Some(first) = self.request_cookies.iter().find(|c| c.name == cookie.name) {
            let first = first.clone();
            self.duplicate_cookies
                .entry(cookie.name.clone())
                .or_insert_with(|| vec![first])
                .push(cookie.clone());
        }
        self.request_cookies.push(cookie);
    }

    /// Primary (first) request cookie with the given name
    pub fn request_cookie(&self, name: &str) -> Option<&Cookie> {
        self.request_cookies.iter().find(|c| c.name == name)
    }

    /// All request cookies in header order
    pub fn request_cookies(&self) -> &[Cookie] {
        &self.request_cookies
    }

    /// Every cookie sharing `name`, in header order, when the name was sent more than once
    pub fn duplicate_cookies(&self, name: &str) -> Option<&[Cookie]> {
        self.duplicate_cookies.get(name).map(Vec::as_slice)
    }

    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }

    /// Write a response cookie, replacing any earlier cookie of the same name
    pub fn set_response_cookie(&mut self, cookie: Cookie) {
        self.response_cookies.retain(|c| c.name != cookie.name);
        self.response_cookies.push(cookie);
    }

    pub fn response_cookie(&self, name: &str) -> Option<&Cookie> {
        self.response_cookies.iter().find(|c| c.name == name)
    }

    pub fn response_cookies(&self) -> &[Cookie] {
        &self.response_cookies
    }

    /// `Set-Cookie` header values for everything written during this request
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.response_cookies
            .iter()
            .map(Cookie::to_set_cookie_header)
            .collect()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut RequestState {
        &mut self.state
    }
}
