//! Handler capability contracts.
//!
//! A handler serves exactly one request type, declared through its
//! associated `Request` type; registration reads that binding at compile
//! time. `handle` is the only method an author must implement; the
//! lifecycle hooks and `dispose` default to no-ops and are overridden by
//! supplying non-default bodies.

use crate::message::{OneWayRequest, Request, Response};

/// Boxed error returned by a handler's `handle` step.
///
/// Faults propagate to the dispatch caller unchanged; the lifecycle does
/// not catch them, and `after_handle` does not run when `handle` fails.
pub type HandlerFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Two-way handler capability: consumes a typed request and produces a
/// typed response.
///
/// The `Default` bound on [`RequestHandler::Response`] is the explicit
/// zero-argument construction path used to synthesize default response
/// shells before a handler runs.
///
/// Handlers are built fresh for every dispatch and may carry per-call
/// working state in `&mut self`; nothing is shared between invocations.
pub trait RequestHandler: Send + 'static {
    /// The request type this handler is bound to.
    type Request: Request;

    /// The response type produced by `handle`.
    type Response: Response + Default;

    /// Setup/validation hook, runs before `handle`. Default no-op.
    fn before_handle(&mut self, _request: &Self::Request) {}

    /// The handler's core logic.
    fn handle(&mut self, request: &Self::Request) -> Result<Self::Response, HandlerFault>;

    /// Cleanup/audit hook, runs after a successful `handle`. Default no-op.
    fn after_handle(&mut self, _request: &Self::Request) {}

    /// Release resources acquired during `handle`. Default no-op.
    ///
    /// Runs once the invocation completes, on the success and the fault
    /// path alike. Handlers that need unwind-safe cleanup should implement
    /// `Drop` instead.
    fn dispose(&mut self) {}
}

/// One-way handler capability: same lifecycle shape, no response value.
pub trait OneWayHandler: Send + 'static {
    /// The request type this handler is bound to.
    type Request: OneWayRequest;

    /// Setup/validation hook, runs before `handle`. Default no-op.
    fn before_handle(&mut self, _request: &Self::Request) {}

    /// The handler's core logic.
    fn handle(&mut self, request: &Self::Request) -> Result<(), HandlerFault>;

    /// Cleanup/audit hook, runs after a successful `handle`. Default no-op.
    fn after_handle(&mut self, _request: &Self::Request) {}

    /// Release resources acquired during `handle`. Default no-op.
    fn dispose(&mut self) {}
}
