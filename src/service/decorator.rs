//! # Encoded Session Config
//!
//! [`SessionConfig`] decorator that encodes and decodes the session identifier,
//! keeping routing metadata invisible to the request handler, the session
//! store and application code.
//!
//! ## Resolution
//! 1. Read the raw identifier from the inner config; none means no session.
//! 2. Decode it.
//! 3. With ambiguity recovery enabled, confirm the decoded id in the session
//!    directory. When it is unknown, scan the duplicate cookies reported for
//!    the session cookie name in the order the client sent them; the first one
//!    whose decoded id exists wins.
//! 4. Re-encode the accepted id. If the wire form drifted (e.g. the session
//!    failed over to another node) and nothing was assigned explicitly during
//!    this request, write the fresh encoding back through the inner config.
//!
//! ## Example
//! ```rust
//! use routed_session::core::codec::RouteCodec;
//! use routed_session::core::exchange::Exchange;
//! use routed_session::core::session_config::SessionConfig;
//! use routed_session::service::decorator::EncodedSessionConfig;
//! use routed_session::transport::CookieSessionConfig;
//!
//! let decorator = EncodedSessionConfig::new(
//!     CookieSessionConfig::new("JSESSIONID"),
//!     RouteCodec::new(Some("node-2".to_string())),
//! );
//!
//! let mut exchange = Exchange::from_cookie_header("JSESSIONID=Zx81kQ.node-1");
//! let plain = decorator.find_session_id(&mut exchange).unwrap();
//! assert_eq!(plain.as_deref(), Some("Zx81kQ"));
//! // The route changed, so the cookie was rewritten for this node
//! assert_eq!(
//!     exchange.response_cookie("JSESSIONID").map(|c| c.value.as_str()),
//!     Some("Zx81kQ.node-2")
//! );
//! ```

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::config::SessionTierConfig;
use crate::core::codec::SessionIdCodec;
use crate::core::directory::SessionDirectory;
use crate::core::exchange::Exchange;
use crate::core::session_config::{SessionConfig, SessionCookieSource};
use crate::error::Result;
use crate::utils::metrics::DecoratorMetrics;

/// Directory and cookie name used to validate ids and scan duplicate cookies
struct AmbiguityRecovery {
    directory: Arc<dyn SessionDirectory>,
    cookie_name: String,
}

/// Session config that exposes plain identifiers and carries encoded ones
pub struct EncodedSessionConfig<S, C> {
    inner: S,
    codec: C,
    recovery: Option<AmbiguityRecovery>,
    metrics: Arc<DecoratorMetrics>,
}

impl<S, C> EncodedSessionConfig<S, C>
where
    S: SessionConfig,
    C: SessionIdCodec,
{
    /// Decode-only decorator; decoded identifiers are accepted without a directory check
    pub fn new(inner: S, codec: C) -> Self {
        Self {
            inner,
            codec,
            recovery: None,
            metrics: Arc::new(DecoratorMetrics::new()),
        }
    }

    /// Decorator with ambiguity recovery against `directory`
    ///
    /// An empty `cookie_name` leaves recovery disabled.
    pub fn with_recovery<N: Into<String>>(
        inner: S,
        codec: C,
        directory: Arc<dyn SessionDirectory>,
        cookie_name: N,
    ) -> Self {
        let cookie_name = cookie_name.into();
        let mut decorator = Self::new(inner, codec);
        if !cookie_name.is_empty() {
            decorator.recovery = Some(AmbiguityRecovery {
                directory,
                cookie_name,
            });
        }
        decorator
    }

    /// Build from configuration
    ///
    /// Recovery is enabled when `recovery.ambiguity_recovery` is set and a
    /// directory is supplied.
    pub fn from_config(
        inner: S,
        codec: C,
        directory: Option<Arc<dyn SessionDirectory>>,
        config: &SessionTierConfig,
    ) -> Self {
        match directory {
            Some(directory) if config.recovery.ambiguity_recovery => {
                Self::with_recovery(inner, codec, directory, config.cookie.name.as_str())
            }
            _ => Self::new(inner, codec),
        }
    }

    pub fn recovery_enabled(&self) -> bool {
        self.recovery.is_some()
    }

    pub fn metrics(&self) -> Arc<DecoratorMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Confirm `candidate` in the directory, falling back to duplicate cookies
    ///
    /// Returns the accepted plain id together with the encoded value it came from.
    fn recover(
        &self,
        recovery: &AmbiguityRecovery,
        exchange: &Exchange,
        candidate: String,
        encoded: String,
    ) -> Result<Option<(String, String)>> {
        if recovery.directory.lookup(&candidate)?.is_some() {
            self.metrics.directory_hit();
            return Ok(Some((candidate, encoded)));
        }
        self.metrics.directory_miss();

        let Some(duplicates) = exchange.duplicate_cookies(&recovery.cookie_name) else {
            trace!("Decoded id unknown and no duplicate cookies reported");
            return Ok(None);
        };

        // An empty value carries no session, same as an empty primary cookie
        for cookie in duplicates.iter().filter(|c| !c.value.is_empty()) {
            let plain = self.codec.decode(&cookie.value)?;
            match recovery.directory.lookup(&plain)? {
                Some(session) => {
                    self.metrics.directory_hit();
                    self.metrics.duplicate_recovery();
                    debug!(
                        session_id = %session.id,
                        encoded_id = %cookie.value,
                        "Found a session from duplicate request cookies"
                    );
                    return Ok(Some((plain, cookie.value.clone())));
                }
                None => self.metrics.directory_miss(),
            }
        }

        trace!(
            duplicate_count = duplicates.len(),
            "No duplicate cookie matched an active session"
        );
        Ok(None)
    }
}

impl<S, C> SessionConfig for EncodedSessionConfig<S, C>
where
    S: SessionConfig,
    C: SessionIdCodec,
{
    #[instrument(skip_all)]
    fn find_session_id(&self, exchange: &mut Exchange) -> Result<Option<String>> {
        self.metrics.resolve_attempt();

        let Some(encoded) = self.inner.find_session_id(exchange)? else {
            self.metrics.resolve_absent();
            return Ok(None);
        };
        let candidate = self.codec.decode(&encoded)?;

        let accepted = match self.recovery {
            Some(ref recovery) => self.recover(recovery, exchange, candidate, encoded)?,
            None => Some((candidate, encoded)),
        };

        let Some((session_id, source)) = accepted else {
            self.metrics.resolve_absent();
            return Ok(None);
        };

        // An explicit assignment in this request wins over the refreshed encoding
        if !exchange.state().is_session_id_set() {
            let reencoded = self.codec.encode(&session_id)?;
            if reencoded != source {
                debug!(
                    previous = %source,
                    current = %reencoded,
                    "Session id encoding changed, updating transport"
                );
                self.inner.set_session_id(exchange, &reencoded)?;
                self.metrics.reencode_write();
            }
        }

        Ok(Some(session_id))
    }

    fn set_session_id(&self, exchange: &mut Exchange, session_id: &str) -> Result<()> {
        exchange.state_mut().mark_session_id_set();
        self.metrics.assignment();
        let encoded = self.codec.encode(session_id)?;
        self.inner.set_session_id(exchange, &encoded)
    }

    fn clear_session(&self, exchange: &mut Exchange, session_id: &str) -> Result<()> {
        self.metrics.clear();
        let encoded = self.codec.encode(session_id)?;
        self.inner.clear_session(exchange, &encoded)
    }

    fn session_cookie_source(&self, exchange: &Exchange) -> SessionCookieSource {
        self.inner.session_cookie_source(exchange)
    }

    fn rewrite_url(&self, original_url: &str, session_id: &str) -> Result<String> {
        let encoded = self.codec.encode(session_id)?;
        self.inner.rewrite_url(original_url, &encoded)
    }
}
