//! Handler sets and the startup scanner.
//!
//! A [`HandlerSet`] is an ordered collection of handler registrations, the
//! unit a service assembles its handlers in. The [`Scanner`] folds one or
//! more sets into a frozen [`Registry`], enforcing that at most one handler
//! is bound per (request type, kind).
//!
//! Registration is where request-type resolution happens: `register::<H>()`
//! reads `H::Request` at compile time, so every registration carries
//! exactly one request type and a handler with no inferable request type is
//! a compile error rather than a scan-time surprise.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;

use tracing::{debug, warn};

use crate::config::{DuplicatePolicy, ScanPolicy};
use crate::error::ScanError;
use crate::handler::{OneWayHandler, RequestHandler};
use crate::lifecycle::{ErasedOneWayHandler, ErasedRequestHandler, OneWayLifecycle, RequestLifecycle};
use crate::message::{Response, TypeInfo};
use crate::registry::{
    HandlerKind, OneWayBinding, OneWayHandlerFactory, Registry, RequestHandlerFactory,
    ResponseConstructor, TwoWayBinding,
};

/// One prepared handler registration inside a [`HandlerSet`].
struct Registration {
    request: TypeInfo,
    handler: &'static str,
    constructor: Constructor,
}

enum Constructor {
    TwoWay {
        factory: RequestHandlerFactory,
        default_response: ResponseConstructor,
    },
    OneWay {
        factory: OneWayHandlerFactory,
    },
}

impl Registration {
    fn kind(&self) -> HandlerKind {
        match self.constructor {
            Constructor::TwoWay { .. } => HandlerKind::TwoWay,
            Constructor::OneWay { .. } => HandlerKind::OneWay,
        }
    }
}

/// A named, ordered source of handler registrations.
pub struct HandlerSet {
    name: &'static str,
    entries: Vec<Registration>,
}

impl HandlerSet {
    /// Create an empty set. The name appears in scan log events.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    /// Register a two-way handler constructed via `Default`.
    pub fn register<H>(self) -> Self
    where
        H: RequestHandler + Default,
    {
        self.register_with(H::default)
    }

    /// Register a two-way handler with an explicit factory.
    ///
    /// The factory runs once per dispatch; handlers are transient, never
    /// reused across invocations.
    pub fn register_with<H, F>(mut self, factory: F) -> Self
    where
        H: RequestHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.entries.push(Registration {
            request: TypeInfo::of::<H::Request>(),
            handler: type_name::<H>(),
            constructor: Constructor::TwoWay {
                factory: Box::new(move || {
                    Box::new(RequestLifecycle::new(factory())) as Box<dyn ErasedRequestHandler>
                }),
                default_response: Box::new(|| {
                    Box::new(H::Response::default()) as Box<dyn Response>
                }),
            },
        });
        self
    }

    /// Register a one-way handler constructed via `Default`.
    pub fn register_one_way<H>(self) -> Self
    where
        H: OneWayHandler + Default,
    {
        self.register_one_way_with(H::default)
    }

    /// Register a one-way handler with an explicit factory.
    pub fn register_one_way_with<H, F>(mut self, factory: F) -> Self
    where
        H: OneWayHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.entries.push(Registration {
            request: TypeInfo::of::<H::Request>(),
            handler: type_name::<H>(),
            constructor: Constructor::OneWay {
                factory: Box::new(move || {
                    Box::new(OneWayLifecycle::new(factory())) as Box<dyn ErasedOneWayHandler>
                }),
            },
        });
        self
    }

    /// Name given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of registrations in this set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Folds handler sets into a frozen [`Registry`].
///
/// Scanning is a one-time, single-threaded bulk operation; run it during
/// initialization, before any dispatch. Sets and their registrations are
/// processed in insertion order, so the scan is deterministic and, under
/// [`DuplicatePolicy::LastWins`], the binding scanned last survives.
pub struct Scanner {
    policy: ScanPolicy,
    sets: Vec<HandlerSet>,
}

impl Scanner {
    /// Scanner with the default policy (duplicate bindings rejected).
    pub fn new() -> Self {
        Self::with_policy(ScanPolicy::default())
    }

    /// Scanner with an explicit policy.
    pub fn with_policy(policy: ScanPolicy) -> Self {
        Self {
            policy,
            sets: Vec::new(),
        }
    }

    /// Queue a handler set. Sets are scanned in the order they were added.
    pub fn add_set(mut self, set: HandlerSet) -> Self {
        self.sets.push(set);
        self
    }

    /// Scan every queued set into a registry.
    ///
    /// The scanner only populates bindings and emits log events; no handler
    /// is instantiated or invoked here.
    pub fn scan(self) -> Result<Registry, ScanError> {
        let Scanner { policy, sets } = self;

        let mut two_way: HashMap<TypeId, TwoWayBinding> = HashMap::new();
        let mut one_way: HashMap<TypeId, OneWayBinding> = HashMap::new();

        for set in sets {
            let set_name = set.name;
            for entry in set.entries {
                let kind = entry.kind();
                let shadowed = match kind {
                    HandlerKind::TwoWay => two_way.get(&entry.request.id).map(|b| b.handler),
                    HandlerKind::OneWay => one_way.get(&entry.request.id).map(|b| b.handler),
                };

                if let Some(existing) = shadowed {
                    match policy.on_duplicate {
                        DuplicatePolicy::Reject => {
                            return Err(ScanError::DuplicateBinding {
                                kind,
                                request: entry.request.name,
                                existing,
                                incoming: entry.handler,
                            });
                        }
                        DuplicatePolicy::LastWins => {
                            warn!(
                                set = %set_name,
                                request = %entry.request.name,
                                shadowed = %existing,
                                handler = %entry.handler,
                                "Duplicate binding, keeping the handler scanned last"
                            );
                        }
                    }
                } else {
                    debug!(
                        set = %set_name,
                        request = %entry.request.name,
                        handler = %entry.handler,
                        kind = %kind,
                        "Registered handler binding"
                    );
                }

                match entry.constructor {
                    Constructor::TwoWay {
                        factory,
                        default_response,
                    } => {
                        two_way.insert(
                            entry.request.id,
                            TwoWayBinding {
                                request: entry.request,
                                handler: entry.handler,
                                factory,
                                default_response,
                                dispatched: AtomicU64::new(0),
                            },
                        );
                    }
                    Constructor::OneWay { factory } => {
                        one_way.insert(
                            entry.request.id,
                            OneWayBinding {
                                request: entry.request,
                                handler: entry.handler,
                                factory,
                                dispatched: AtomicU64::new(0),
                            },
                        );
                    }
                }
            }
        }

        Ok(Registry::from_parts(two_way, one_way))
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}
