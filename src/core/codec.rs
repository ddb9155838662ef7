//! # Session Id Codecs
//!
//! Transforms between the plain session identifier seen by the application and
//! the encoded form carried on the wire.
//!
//! A codec must satisfy `decode(encode(x)) == x` for a fixed routing state. The
//! encoded bytes may change when the routing state changes (for example after
//! a failover moves a session to another node) while still decoding to `x`.
//!
//! ## Route codec wire format
//! ```text
//! <plain-id><delimiter><route>      e.g. "Zx81kQ.node-2"
//! <plain-id>                        when no route is configured
//! ```

use std::sync::{Arc, RwLock};

use crate::config::RoutingSettings;
use crate::error::{constants, Result, SessionError};

/// Encode/decode of a session identifier
pub trait SessionIdCodec: Send + Sync {
    fn encode(&self, plain_id: &str) -> Result<String>;

    fn decode(&self, encoded_id: &str) -> Result<String>;
}

impl<T: SessionIdCodec + ?Sized> SessionIdCodec for Arc<T> {
    fn encode(&self, plain_id: &str) -> Result<String> {
        (**self).encode(plain_id)
    }

    fn decode(&self, encoded_id: &str) -> Result<String> {
        (**self).decode(encoded_id)
    }
}

/// Codec that leaves identifiers untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCodec;

impl SessionIdCodec for IdentityCodec {
    fn encode(&self, plain_id: &str) -> Result<String> {
        Ok(plain_id.to_string())
    }

    fn decode(&self, encoded_id: &str) -> Result<String> {
        Ok(encoded_id.to_string())
    }
}

/// Appends the owning node's route to the plain identifier
///
/// The route is shared state: swapping it with [`RouteCodec::update_route`]
/// changes how every subsequent identifier is encoded, while identifiers
/// encoded under the previous route still decode to the same plain id.
#[derive(Debug)]
pub struct RouteCodec {
    route: RwLock<Option<String>>,
    delimiter: char,
}

impl RouteCodec {
    /// Create a codec using `.` as the route delimiter
    pub fn new(route: Option<String>) -> Self {
        Self::with_delimiter(route, '.')
    }

    pub fn with_delimiter(route: Option<String>, delimiter: char) -> Self {
        Self {
            route: RwLock::new(route.filter(|r| !r.is_empty())),
            delimiter,
        }
    }

    pub fn from_config(settings: &RoutingSettings) -> Result<Self> {
        let codec = Self::with_delimiter(None, settings.delimiter);
        codec.update_route(settings.route.clone())?;
        Ok(codec)
    }

    /// Route currently appended to encoded identifiers
    pub fn route(&self) -> Result<Option<String>> {
        let route = self.route.read().map_err(|_| {
            SessionError::CodecError(constants::ERR_ROUTE_READ_LOCK.to_string())
        })?;
        Ok(route.clone())
    }

    /// Replace the route, e.g. after this node takes over sessions of a failed peer
    pub fn update_route(&self, route: Option<String>) -> Result<()> {
        let route = route.filter(|r| !r.is_empty());
        if let Some(ref r) = route {
            if r.contains(self.delimiter) {
                return Err(SessionError::CodecError(
                    constants::ERR_DELIMITER_IN_ROUTE.to_string(),
                ));
            }
        }
        let mut current = self.route.write().map_err(|_| {
            SessionError::CodecError(constants::ERR_ROUTE_WRITE_LOCK.to_string())
        })?;
        *current = route;
        Ok(())
    }
}

impl SessionIdCodec for RouteCodec {
    fn encode(&self, plain_id: &str) -> Result<String> {
        if plain_id.is_empty() {
            return Err(SessionError::InvalidSessionId(
                constants::ERR_EMPTY_PLAIN_ID.to_string(),
            ));
        }
        if plain_id.contains(self.delimiter) {
            return Err(SessionError::InvalidSessionId(format!(
                "plain identifier contains route delimiter '{}'",
                self.delimiter
            )));
        }

        let route = self.route.read().map_err(|_| {
            SessionError::CodecError(constants::ERR_ROUTE_READ_LOCK.to_string())
        })?;
        Ok(match route.as_deref() {
            Some(route) => format!("{plain_id}{}{route}", self.delimiter),
            None => plain_id.to_string(),
        })
    }

    fn decode(&self, encoded_id: &str) -> Result<String> {
        if encoded_id.is_empty() {
            return Err(SessionError::InvalidSessionId(
                constants::ERR_EMPTY_SESSION_ID.to_string(),
            ));
        }

        let plain = match encoded_id.find(self.delimiter) {
            Some(index) => &encoded_id[..index],
            None => encoded_id,
        };
        if plain.is_empty() {
            return Err(SessionError::InvalidSessionId(format!(
                "no identifier before route in '{encoded_id}'"
            )));
        }
        Ok(plain.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_appends_route() {
        let codec = RouteCodec::new(Some("node1".to_string()));
        assert_eq!(codec.encode("abc").unwrap(), "abc.node1");
        assert_eq!(codec.decode("abc.node1").unwrap(), "abc");
    }

    #[test]
    fn test_without_route() {
        let codec = RouteCodec::new(None);
        assert_eq!(codec.encode("abc").unwrap(), "abc");
        assert_eq!(codec.decode("abc").unwrap(), "abc");
    }

    #[test]
    fn test_route_change_keeps_plain_id() {
        let codec = RouteCodec::new(Some("node1".to_string()));
        let before = codec.encode("abc").unwrap();

        codec.update_route(Some("node2".to_string())).unwrap();
        let after = codec.encode("abc").unwrap();

        assert_ne!(before, after);
        assert_eq!(codec.decode(&before).unwrap(), "abc");
        assert_eq!(codec.decode(&after).unwrap(), "abc");
    }

    #[test]
    fn test_custom_delimiter() {
        let codec = RouteCodec::with_delimiter(Some("n1".to_string()), ':');
        assert_eq!(codec.encode("abc").unwrap(), "abc:n1");
        assert_eq!(codec.decode("abc:n1").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_inputs() {
        let codec = RouteCodec::new(Some("node1".to_string()));
        assert!(matches!(
            codec.decode(""),
            Err(SessionError::InvalidSessionId(_))
        ));
        assert!(matches!(
            codec.decode(".node1"),
            Err(SessionError::InvalidSessionId(_))
        ));
        assert!(matches!(
            codec.encode(""),
            Err(SessionError::InvalidSessionId(_))
        ));
        assert!(matches!(
            codec.encode("a.b"),
            Err(SessionError::InvalidSessionId(_))
        ));
        assert!(matches!(
            codec.update_route(Some("bad.route".to_string())),
            Err(SessionError::CodecError(_))
        ));
    }

    #[test]
    fn test_poisoned_route_is_codec_error() {
        let codec = RouteCodec::new(Some("node1".to_string()));
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = codec.route.write();
                    panic!("route writer panicked");
                })
                .join();
        });

        match codec.encode("abc") {
            Err(SessionError::CodecError(msg)) => assert_eq!(msg, constants::ERR_ROUTE_READ_LOCK),
            other => panic!("Unexpected result: {other:?}"),
        }
        assert!(matches!(
            codec.update_route(None),
            Err(SessionError::CodecError(msg)) if msg == constants::ERR_ROUTE_WRITE_LOCK
        ));
        // Decoding never reads the route
        assert_eq!(codec.decode("abc.node1").unwrap(), "abc");
    }

    #[test]
    fn test_identity_codec() {
        assert_eq!(IdentityCodec.encode("a.b").unwrap(), "a.b");
        assert_eq!(IdentityCodec.decode("a.b").unwrap(), "a.b");
    }
}
