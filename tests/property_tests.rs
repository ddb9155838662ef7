//! Property-based tests using proptest
//!
//! These tests validate decorator invariants across randomly generated
//! identifiers, routes and duplicate-cookie orderings.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use routed_session::core::codec::{RouteCodec, SessionIdCodec};
use routed_session::core::exchange::{Cookie, Exchange};
use routed_session::core::session_config::SessionConfig;
use routed_session::service::decorator::EncodedSessionConfig;
use routed_session::store::SessionRegistry;
use routed_session::transport::CookieSessionConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn plain_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,32}"
}

fn route() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,12}"
}

// Property: decode(encode(p)) == p for a fixed route
proptest! {
    #[test]
    fn prop_codec_roundtrip(id in plain_id(), route in proptest::option::of(route())) {
        let codec = RouteCodec::new(route);
        let encoded = codec.encode(&id).expect("Encoding should not fail");
        prop_assert_eq!(codec.decode(&encoded).expect("Decoding should not fail"), id);
    }
}

// Property: an id encoded under an old route still decodes to the same plain id
proptest! {
    #[test]
    fn prop_route_change_preserves_plain_id(id in plain_id(), old in route(), new in route()) {
        let codec = RouteCodec::new(Some(old));
        let before = codec.encode(&id).unwrap();
        codec.update_route(Some(new)).unwrap();
        let after = codec.encode(&id).unwrap();

        prop_assert_eq!(codec.decode(&before).unwrap(), id.clone());
        prop_assert_eq!(codec.decode(&after).unwrap(), id);
    }
}

// Property: resolve after assign in the same request yields the assigned id
proptest! {
    #[test]
    fn prop_resolve_after_assign(id in plain_id(), route in route(), stale in plain_id()) {
        let decorator = EncodedSessionConfig::new(
            CookieSessionConfig::new("JSESSIONID"),
            RouteCodec::new(Some(route)),
        );
        let mut exchange = Exchange::new().with_request_cookie(Cookie::new("JSESSIONID", stale));

        decorator.set_session_id(&mut exchange, &id).unwrap();
        let resolved = decorator.find_session_id(&mut exchange).unwrap();

        prop_assert_eq!(resolved, Some(id));
        prop_assert_eq!(exchange.response_cookies().len(), 1);
    }
}

// Property: the first duplicate (in header order) naming a live session wins
proptest! {
    #[test]
    fn prop_first_live_duplicate_wins(
        ids in proptest::collection::vec(plain_id(), 1..8),
        live_mask in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let codec = RouteCodec::new(Some("n1".to_string()));
        let registry = Arc::new(SessionRegistry::new(64, Duration::from_secs(60)));
        let mut live_ids = HashSet::new();
        for (id, live) in ids.iter().zip(&live_mask) {
            if *live {
                registry.register(id.as_str()).unwrap();
                live_ids.insert(id.clone());
            }
        }

        // '~' never appears in generated ids, so the primary cookie is never live
        let mut exchange = Exchange::new()
            .with_request_cookie(Cookie::new("JSESSIONID", "~stale.n1"));
        for id in &ids {
            exchange = exchange.with_request_cookie(Cookie::new("JSESSIONID", codec.encode(id).unwrap()));
        }

        let expected = ids.iter().find(|id| live_ids.contains(*id)).cloned();

        let decorator = EncodedSessionConfig::with_recovery(
            CookieSessionConfig::new("JSESSIONID"),
            codec,
            registry,
            "JSESSIONID",
        );
        prop_assert_eq!(decorator.find_session_id(&mut exchange).unwrap(), expected);
    }
}

// Property: without recovery, resolve returns decode(raw) regardless of duplicates
proptest! {
    #[test]
    fn prop_decode_only_ignores_duplicates(primary in plain_id(), others in proptest::collection::vec(plain_id(), 0..4)) {
        let codec = RouteCodec::new(Some("n1".to_string()));
        let mut exchange = Exchange::new()
            .with_request_cookie(Cookie::new("JSESSIONID", codec.encode(&primary).unwrap()));
        for id in &others {
            exchange = exchange.with_request_cookie(Cookie::new("JSESSIONID", codec.encode(id).unwrap()));
        }

        let decorator = EncodedSessionConfig::new(CookieSessionConfig::new("JSESSIONID"), codec);
        prop_assert_eq!(decorator.find_session_id(&mut exchange).unwrap(), Some(primary));
        prop_assert!(exchange.response_cookies().is_empty());
    }
}

// Property: parsing arbitrary cookie headers never panics
proptest! {
    #[test]
    fn prop_cookie_header_parsing_never_panics(header in ".{0,256}") {
        let exchange = Exchange::from_cookie_header(&header);
        if let Some(dups) = exchange.duplicate_cookies("JSESSIONID") {
            prop_assert!(dups.len() >= 2);
        }
    }
}
