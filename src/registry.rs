//! The binding registry: request types mapped to handler factories.
//!
//! A [`Registry`] is produced by [`Scanner::scan`](crate::scan::Scanner::scan)
//! and never mutated afterwards, so it can be read from any number of
//! dispatch threads without locking. Each binding owns the factory that
//! builds a fresh handler instance per dispatch and, for two-way bindings,
//! the constructor for the default response shell.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::lifecycle::{ErasedOneWayHandler, ErasedRequestHandler};
use crate::message::{OneWayRequest, Request, Response, TypeInfo};

/// Which dispatch shape a binding serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Fire-and-forget; no response value.
    OneWay,
    /// Request/response pair.
    TwoWay,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneWay => f.write_str("one-way"),
            Self::TwoWay => f.write_str("two-way"),
        }
    }
}

/// Factory producing a fresh erased two-way handler per dispatch.
pub(crate) type RequestHandlerFactory =
    Box<dyn Fn() -> Box<dyn ErasedRequestHandler> + Send + Sync>;

/// Factory producing a fresh erased one-way handler per dispatch.
pub(crate) type OneWayHandlerFactory = Box<dyn Fn() -> Box<dyn ErasedOneWayHandler> + Send + Sync>;

/// Constructor for a two-way binding's default response shell.
pub(crate) type ResponseConstructor = Box<dyn Fn() -> Box<dyn Response> + Send + Sync>;

pub(crate) struct TwoWayBinding {
    pub(crate) request: TypeInfo,
    pub(crate) handler: &'static str,
    pub(crate) factory: RequestHandlerFactory,
    pub(crate) default_response: ResponseConstructor,
    pub(crate) dispatched: AtomicU64,
}

pub(crate) struct OneWayBinding {
    pub(crate) request: TypeInfo,
    pub(crate) handler: &'static str,
    pub(crate) factory: OneWayHandlerFactory,
    pub(crate) dispatched: AtomicU64,
}

/// Descriptive view of one live binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingInfo {
    /// Bound request type name.
    pub request: &'static str,
    /// Handler type name.
    pub handler: &'static str,
    /// Dispatch shape.
    pub kind: HandlerKind,
}

/// Immutable registry of handler bindings, frozen at the end of a scan.
pub struct Registry {
    pub(crate) two_way: HashMap<TypeId, TwoWayBinding>,
    pub(crate) one_way: HashMap<TypeId, OneWayBinding>,
}

impl Registry {
    pub(crate) fn from_parts(
        two_way: HashMap<TypeId, TwoWayBinding>,
        one_way: HashMap<TypeId, OneWayBinding>,
    ) -> Self {
        Self { two_way, one_way }
    }

    /// Number of live bindings across both kinds.
    pub fn len(&self) -> usize {
        self.two_way.len() + self.one_way.len()
    }

    /// Whether the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.two_way.is_empty() && self.one_way.is_empty()
    }

    /// Whether a two-way binding exists for `R`.
    pub fn has_handler_for<R: Request>(&self) -> bool {
        self.two_way.contains_key(&TypeId::of::<R>())
    }

    /// Whether a one-way binding exists for `R`.
    pub fn has_one_way_handler_for<R: OneWayRequest>(&self) -> bool {
        self.one_way.contains_key(&TypeId::of::<R>())
    }

    /// Iterate descriptive views of every live binding.
    ///
    /// Exposed so outer layers (serialization whitelists, startup banners)
    /// can enumerate what is dispatchable. Iteration order is unspecified.
    pub fn bindings(&self) -> impl Iterator<Item = BindingInfo> + '_ {
        let two_way = self.two_way.values().map(|b| BindingInfo {
            request: b.request.name,
            handler: b.handler,
            kind: HandlerKind::TwoWay,
        });
        let one_way = self.one_way.values().map(|b| BindingInfo {
            request: b.request.name,
            handler: b.handler,
            kind: HandlerKind::OneWay,
        });
        two_way.chain(one_way)
    }

    /// Per-request dispatch counts, most used first.
    ///
    /// Bindings that have never been dispatched are omitted.
    pub fn dispatch_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .two_way
            .values()
            .map(|b| (b.request.name, b.dispatched.load(Ordering::Relaxed)))
            .chain(
                self.one_way
                    .values()
                    .map(|b| (b.request.name, b.dispatched.load(Ordering::Relaxed))),
            )
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_kind_display() {
        assert_eq!(HandlerKind::OneWay.to_string(), "one-way");
        assert_eq!(HandlerKind::TwoWay.to_string(), "two-way");
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::from_parts(HashMap::new(), HashMap::new());
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.bindings().count(), 0);
        assert!(registry.dispatch_stats().is_empty());
    }
}
