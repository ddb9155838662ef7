use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use routed_session::core::codec::RouteCodec;
use routed_session::core::exchange::Exchange;
use routed_session::core::session_config::SessionConfig;
use routed_session::service::decorator::EncodedSessionConfig;
use routed_session::store::SessionRegistry;
use routed_session::transport::CookieSessionConfig;
use std::sync::Arc;
use std::time::Duration;

#[allow(clippy::unwrap_used)]
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let registry = Arc::new(SessionRegistry::new(10_000, Duration::from_secs(3600)));
    for i in 0..10_000 {
        registry.register(format!("session{i}")).unwrap();
    }

    let decode_only = EncodedSessionConfig::new(
        CookieSessionConfig::new("JSESSIONID"),
        RouteCodec::new(Some("node-1".to_string())),
    );
    let recovering = EncodedSessionConfig::with_recovery(
        CookieSessionConfig::new("JSESSIONID"),
        RouteCodec::new(Some("node-1".to_string())),
        registry,
        "JSESSIONID",
    );

    group.bench_function("decode_only", |b| {
        b.iter_batched(
            || Exchange::from_cookie_header("JSESSIONID=session42.node-1"),
            |mut exchange| decode_only.find_session_id(&mut exchange).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("directory_hit", |b| {
        b.iter_batched(
            || Exchange::from_cookie_header("JSESSIONID=session42.node-1"),
            |mut exchange| recovering.find_session_id(&mut exchange).unwrap(),
            BatchSize::SmallInput,
        )
    });

    for dup_count in [2usize, 8, 32] {
        group.bench_function(format!("duplicate_scan_{dup_count}"), |b| {
            let mut header: Vec<String> = (0..dup_count - 1)
                .map(|i| format!("JSESSIONID=stale{i}.node-3"))
                .collect();
            header.push("JSESSIONID=session42.node-2".to_string());
            let header = header.join("; ");

            b.iter_batched(
                || Exchange::from_cookie_header(&header),
                |mut exchange| recovering.find_session_id(&mut exchange).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
