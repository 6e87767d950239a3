//! The invocation template: type-erased lifecycle adapters.
//!
//! The registry stores handlers behind erased capability traits so dispatch
//! can be keyed by runtime request type. The adapters here wrap a typed
//! handler and run the fixed Before → Handle → After sequence, downcasting
//! the erased request on entry. A fault from `handle` propagates to the
//! caller and skips `after_handle`.

use std::any::{Any, type_name};

use crate::error::DispatchError;
use crate::handler::{OneWayHandler, RequestHandler};
use crate::message::Response;

/// Erased two-way capability stored in the registry.
pub(crate) trait ErasedRequestHandler: Send {
    /// Run the full lifecycle against an erased request.
    fn run(&mut self, request: &dyn Any) -> Result<Box<dyn Response>, DispatchError>;

    /// Build the default response shell for the bound response type.
    fn default_response(&self) -> Box<dyn Response>;

    /// Disposal hook, forwarded to the typed handler.
    fn dispose(&mut self);
}

/// Erased one-way capability stored in the registry.
pub(crate) trait ErasedOneWayHandler: Send {
    /// Run the full lifecycle against an erased request.
    fn run(&mut self, request: &dyn Any) -> Result<(), DispatchError>;

    /// Disposal hook, forwarded to the typed handler.
    fn dispose(&mut self);
}

/// Lifecycle adapter for two-way handlers.
pub(crate) struct RequestLifecycle<H> {
    handler: H,
}

impl<H: RequestHandler> RequestLifecycle<H> {
    pub(crate) fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H: RequestHandler> ErasedRequestHandler for RequestLifecycle<H> {
    fn run(&mut self, request: &dyn Any) -> Result<Box<dyn Response>, DispatchError> {
        // A mismatch means routing and registry disagree about this request
        // type; surface the wiring defect instead of panicking.
        let typed = request.downcast_ref::<H::Request>().ok_or_else(|| {
            DispatchError::RequestTypeMismatch {
                handler: type_name::<H>(),
                expected: type_name::<H::Request>(),
            }
        })?;

        self.handler.before_handle(typed);
        // A handler fault propagates as-is and skips after_handle.
        let response = self.handler.handle(typed).map_err(DispatchError::Handler)?;
        self.handler.after_handle(typed);
        Ok(Box::new(response))
    }

    fn default_response(&self) -> Box<dyn Response> {
        Box::new(H::Response::default())
    }

    fn dispose(&mut self) {
        self.handler.dispose();
    }
}

/// Lifecycle adapter for one-way handlers.
pub(crate) struct OneWayLifecycle<H> {
    handler: H,
}

impl<H: OneWayHandler> OneWayLifecycle<H> {
    pub(crate) fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H: OneWayHandler> ErasedOneWayHandler for OneWayLifecycle<H> {
    fn run(&mut self, request: &dyn Any) -> Result<(), DispatchError> {
        let typed = request.downcast_ref::<H::Request>().ok_or_else(|| {
            DispatchError::RequestTypeMismatch {
                handler: type_name::<H>(),
                expected: type_name::<H::Request>(),
            }
        })?;

        self.handler.before_handle(typed);
        self.handler.handle(typed).map_err(DispatchError::Handler)?;
        self.handler.after_handle(typed);
        Ok(())
    }

    fn dispose(&mut self) {
        self.handler.dispose();
    }
}
