#![no_main]

use libfuzzer_sys::fuzz_target;
use routed_session::core::codec::RouteCodec;
use routed_session::core::directory::SessionDirectory;
use routed_session::core::exchange::Exchange;
use routed_session::core::session_config::SessionConfig;
use routed_session::service::decorator::EncodedSessionConfig;
use routed_session::store::SessionRegistry;
use routed_session::transport::CookieSessionConfig;
use std::sync::Arc;
use std::time::Duration;

fuzz_target!(|data: &[u8]| {
    // Fuzz cookie header parsing and resolution - errors are fine, panics are not
    let Ok(header) = std::str::from_utf8(data) else {
        return;
    };

    let registry = Arc::new(SessionRegistry::new(16, Duration::from_secs(60)));
    let _ = registry.register("known");
    let directory: Arc<dyn SessionDirectory> = registry;

    let decorator = EncodedSessionConfig::with_recovery(
        CookieSessionConfig::new("JSESSIONID"),
        RouteCodec::new(Some("node-1".to_string())),
        directory,
        "JSESSIONID",
    );

    let mut exchange = Exchange::from_cookie_header(header);
    let _ = decorator.find_session_id(&mut exchange);
});
