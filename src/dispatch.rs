//! The invocation boundary: resolving and invoking handlers.
//!
//! A [`Dispatcher`] wraps a frozen [`Registry`] behind an `Arc` so any
//! number of threads can dispatch concurrently. Every resolution builds a
//! fresh handler instance from the binding's factory; nothing is shared
//! between invocations, so no locking happens here.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::trace;

use crate::error::DispatchError;
use crate::lifecycle::{ErasedOneWayHandler, ErasedRequestHandler};
use crate::message::{OneWayRequest, Request, Response};
use crate::registry::Registry;

/// Invocation boundary over a frozen registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Wrap a scanned registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a fresh two-way handler instance for `R`.
    pub fn resolve<R: Request>(&self) -> Result<RequestInvocation, DispatchError> {
        self.resolve_two_way_by_id(TypeId::of::<R>(), type_name::<R>())
    }

    /// Resolve a fresh one-way handler instance for `R`.
    pub fn resolve_one_way<R: OneWayRequest>(&self) -> Result<OneWayInvocation, DispatchError> {
        self.resolve_one_way_by_id(TypeId::of::<R>(), type_name::<R>())
    }

    /// Resolve and invoke in one step.
    pub fn dispatch<R: Request>(&self, request: &R) -> Result<Box<dyn Response>, DispatchError> {
        self.resolve::<R>()?.invoke(request)
    }

    /// Resolve and invoke a one-way request in one step.
    pub fn dispatch_one_way<R: OneWayRequest>(&self, request: &R) -> Result<(), DispatchError> {
        self.resolve_one_way::<R>()?.invoke(request)
    }

    /// Dispatch a type-erased two-way request, as a transport boundary
    /// holding deserialized messages would.
    pub fn dispatch_boxed(
        &self,
        request: Box<dyn Request>,
    ) -> Result<Box<dyn Response>, DispatchError> {
        let any: &dyn Any = request.as_ref();
        let invocation = self.resolve_two_way_by_id(any.type_id(), request.type_name())?;
        invocation.invoke_erased(any)
    }

    /// Dispatch a type-erased one-way request.
    pub fn dispatch_boxed_one_way(
        &self,
        request: Box<dyn OneWayRequest>,
    ) -> Result<(), DispatchError> {
        let any: &dyn Any = request.as_ref();
        let invocation = self.resolve_one_way_by_id(any.type_id(), request.type_name())?;
        invocation.invoke_erased(any)
    }

    /// Default response shell for the handler bound to `R`, built from the
    /// constructor registered with the binding; no handler instance is
    /// created.
    pub fn default_response_for<R: Request>(&self) -> Result<Box<dyn Response>, DispatchError> {
        let binding = self
            .registry
            .two_way
            .get(&TypeId::of::<R>())
            .ok_or(DispatchError::HandlerNotFound {
                request: type_name::<R>(),
            })?;
        Ok((binding.default_response)())
    }

    fn resolve_two_way_by_id(
        &self,
        id: TypeId,
        request: &'static str,
    ) -> Result<RequestInvocation, DispatchError> {
        let binding = self
            .registry
            .two_way
            .get(&id)
            .ok_or(DispatchError::HandlerNotFound { request })?;
        binding.dispatched.fetch_add(1, Ordering::Relaxed);
        trace!(request = %binding.request.name, handler = %binding.handler, "Resolved two-way handler");
        Ok(RequestInvocation {
            inner: Some((binding.factory)()),
        })
    }

    fn resolve_one_way_by_id(
        &self,
        id: TypeId,
        request: &'static str,
    ) -> Result<OneWayInvocation, DispatchError> {
        let binding = self
            .registry
            .one_way
            .get(&id)
            .ok_or(DispatchError::HandlerNotFound { request })?;
        binding.dispatched.fetch_add(1, Ordering::Relaxed);
        trace!(request = %binding.request.name, handler = %binding.handler, "Resolved one-way handler");
        Ok(OneWayInvocation {
            inner: Some((binding.factory)()),
        })
    }
}

/// A resolved two-way handler instance, good for exactly one invocation.
///
/// Invoking consumes the instance and runs the disposal hook on the success
/// and the fault path alike; an instance dropped without being invoked is
/// disposed by `Drop`.
pub struct RequestInvocation {
    inner: Option<Box<dyn ErasedRequestHandler>>,
}

impl RequestInvocation {
    /// Run the full lifecycle against a typed request.
    pub fn invoke<R: Request>(self, request: &R) -> Result<Box<dyn Response>, DispatchError> {
        self.invoke_erased(request)
    }

    /// Run the full lifecycle against an erased request.
    pub fn invoke_erased(mut self, request: &dyn Any) -> Result<Box<dyn Response>, DispatchError> {
        // Present until the single consuming call takes it.
        let mut handler = self.inner.take().expect("invocation runs once");
        let result = handler.run(request);
        handler.dispose();
        result
    }

    /// Default response shell from the resolved handler.
    pub fn default_response(&self) -> Box<dyn Response> {
        // Present until the single consuming call takes it.
        self.inner
            .as_ref()
            .expect("invocation not yet consumed")
            .default_response()
    }
}

impl Drop for RequestInvocation {
    fn drop(&mut self) {
        if let Some(mut handler) = self.inner.take() {
            handler.dispose();
        }
    }
}

/// A resolved one-way handler instance, good for exactly one invocation.
pub struct OneWayInvocation {
    inner: Option<Box<dyn ErasedOneWayHandler>>,
}

impl OneWayInvocation {
    /// Run the full lifecycle against a typed request.
    pub fn invoke<R: OneWayRequest>(self, request: &R) -> Result<(), DispatchError> {
        self.invoke_erased(request)
    }

    /// Run the full lifecycle against an erased request.
    pub fn invoke_erased(mut self, request: &dyn Any) -> Result<(), DispatchError> {
        // Present until the single consuming call takes it.
        let mut handler = self.inner.take().expect("invocation runs once");
        let result = handler.run(request);
        handler.dispose();
        result
    }
}

impl Drop for OneWayInvocation {
    fn drop(&mut self) {
        if let Some(mut handler) = self.inner.take() {
            handler.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerFault, RequestHandler};
    use crate::scan::{HandlerSet, Scanner};

    struct SumRequest {
        a: u32,
        b: u32,
    }
    impl Request for SumRequest {}

    #[derive(Default)]
    struct SumResponse {
        total: u32,
    }
    impl Response for SumResponse {}

    #[derive(Default)]
    struct SumHandler;
    impl RequestHandler for SumHandler {
        type Request = SumRequest;
        type Response = SumResponse;

        fn handle(&mut self, request: &SumRequest) -> Result<SumResponse, HandlerFault> {
            Ok(SumResponse {
                total: request.a + request.b,
            })
        }
    }

    struct UnboundRequest;
    impl Request for UnboundRequest {}

    fn dispatcher() -> Dispatcher {
        let registry = Scanner::new()
            .add_set(HandlerSet::new("core").register::<SumHandler>())
            .scan()
            .unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_dispatch_round_trip() {
        let response = dispatcher().dispatch(&SumRequest { a: 2, b: 3 }).unwrap();
        assert_eq!(response.downcast_ref::<SumResponse>().unwrap().total, 5);
    }

    #[test]
    fn test_unbound_request_reports_its_type() {
        let err = dispatcher().resolve::<UnboundRequest>().err().unwrap();
        assert_eq!(err.error_code(), "handler_not_found");
        assert!(err.to_string().contains("UnboundRequest"));
    }

    #[test]
    fn test_default_response_without_instance() {
        let shell = dispatcher().default_response_for::<SumRequest>().unwrap();
        assert_eq!(shell.downcast_ref::<SumResponse>().unwrap().total, 0);
    }

    #[test]
    fn test_boxed_dispatch() {
        let request: Box<dyn Request> = Box::new(SumRequest { a: 4, b: 4 });
        let response = dispatcher().dispatch_boxed(request).unwrap();
        assert_eq!(response.downcast_ref::<SumResponse>().unwrap().total, 8);
    }

    #[test]
    fn test_dispatch_counters() {
        let dispatcher = dispatcher();
        assert!(dispatcher.registry().dispatch_stats().is_empty());

        dispatcher.dispatch(&SumRequest { a: 1, b: 1 }).unwrap();
        dispatcher.dispatch(&SumRequest { a: 1, b: 2 }).unwrap();

        let stats = dispatcher.registry().dispatch_stats();
        assert_eq!(stats.len(), 1);
        assert!(stats[0].0.ends_with("SumRequest"));
        assert_eq!(stats[0].1, 2);
    }
}
