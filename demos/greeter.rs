//! End-to-end demo: scan a handler set, dispatch a request, print stats.
//!
//! Run with: `cargo run --example greeter`

use std::sync::Arc;

use svclayer::{
    Dispatcher, HandlerFault, HandlerSet, OneWayHandler, OneWayRequest, Request, RequestHandler,
    Response, Scanner,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct GreetRequest {
    name: String,
}
impl Request for GreetRequest {}

#[derive(Default)]
struct GreetResponse {
    message: String,
}
impl Response for GreetResponse {}

#[derive(Default)]
struct GreetHandler;

impl RequestHandler for GreetHandler {
    type Request = GreetRequest;
    type Response = GreetResponse;

    fn handle(&mut self, request: &GreetRequest) -> Result<GreetResponse, HandlerFault> {
        Ok(GreetResponse {
            message: format!("hello, {}", request.name),
        })
    }
}

struct AuditEvent {
    action: &'static str,
}
impl OneWayRequest for AuditEvent {}

#[derive(Default)]
struct AuditHandler;

impl OneWayHandler for AuditHandler {
    type Request = AuditEvent;

    fn handle(&mut self, event: &AuditEvent) -> Result<(), HandlerFault> {
        info!(action = %event.action, "Audit event recorded");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(true)
        .init();

    let registry = Scanner::new()
        .add_set(
            HandlerSet::new("greeter")
                .register::<GreetHandler>()
                .register_one_way::<AuditHandler>(),
        )
        .scan()?;

    for binding in registry.bindings() {
        info!(request = %binding.request, handler = %binding.handler, kind = %binding.kind, "Live binding");
    }

    let dispatcher = Dispatcher::new(Arc::new(registry));

    let response = dispatcher.dispatch(&GreetRequest {
        name: "world".into(),
    })?;
    let greeting = response
        .downcast_ref::<GreetResponse>()
        .expect("greet handler returns GreetResponse");
    info!(message = %greeting.message, "Two-way dispatch complete");

    dispatcher.dispatch_one_way(&AuditEvent { action: "greeted" })?;

    for (request, count) in dispatcher.registry().dispatch_stats() {
        info!(request = %request, count, "Dispatch count");
    }

    Ok(())
}
