use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;
use svclayer::{
    Dispatcher, HandlerFault, HandlerSet, Request, RequestHandler, Response, Scanner,
};

// Measures the per-dispatch overhead of the core: registry lookup, factory
// construction, lifecycle, and response boxing. The handler body is trivial
// so the numbers isolate dispatch plumbing.

struct EchoRequest {
    value: u64,
}
impl Request for EchoRequest {}

#[derive(Default)]
struct EchoResponse {
    value: u64,
}
impl Response for EchoResponse {}

#[derive(Default)]
struct EchoHandler;
impl RequestHandler for EchoHandler {
    type Request = EchoRequest;
    type Response = EchoResponse;

    fn handle(&mut self, request: &EchoRequest) -> Result<EchoResponse, HandlerFault> {
        Ok(EchoResponse {
            value: request.value,
        })
    }
}

fn dispatch_benchmark(c: &mut Criterion) {
    let registry = Scanner::new()
        .add_set(HandlerSet::new("bench").register::<EchoHandler>())
        .scan()
        .expect("scan");
    let dispatcher = Dispatcher::new(Arc::new(registry));

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("two_way_roundtrip", |b| {
        b.iter(|| dispatcher.dispatch(&EchoRequest { value: 7 }).unwrap())
    });

    group.bench_function("resolve_only", |b| {
        b.iter(|| dispatcher.resolve::<EchoRequest>().unwrap())
    });

    group.bench_function("default_response", |b| {
        b.iter(|| dispatcher.default_response_for::<EchoRequest>().unwrap())
    });

    group.finish();
}

fn scan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_handler_set", |b| {
        b.iter(|| {
            Scanner::new()
                .add_set(HandlerSet::new("bench").register::<EchoHandler>())
                .scan()
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, dispatch_benchmark, scan_benchmark);
criterion_main!(benches);
