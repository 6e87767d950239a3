//! # svclayer
//!
//! Typed request/response dispatch core for service layers.
//!
//! Handlers are plain types that declare the request they serve through an
//! associated type. At startup, handler sets are scanned once into a frozen
//! [`Registry`]; at request time a [`Dispatcher`] resolves a fresh handler
//! instance (transient, never shared between invocations) and runs it
//! through a fixed lifecycle: `before_handle` → `handle` → `after_handle`,
//! with disposal guaranteed afterwards. Two dispatch shapes exist: two-way
//! (produces exactly one response) and one-way (fire-and-forget).
//!
//! ## Features
//!
//! - Compile-time request-type binding: a handler with no inferable request
//!   type does not compile
//! - Uniqueness enforced per (request type, kind) with a configurable
//!   duplicate policy (reject, or last-wins with a logged warning)
//! - Default response shells from a constructor registered with each
//!   two-way binding
//! - Lock-free concurrent dispatch against the frozen registry
//! - Binding introspection and per-request dispatch counters
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use svclayer::{Dispatcher, HandlerFault, HandlerSet, Request, RequestHandler, Response, Scanner};
//!
//! struct GreetRequest {
//!     name: String,
//! }
//! impl Request for GreetRequest {}
//!
//! #[derive(Default)]
//! struct GreetResponse {
//!     message: String,
//! }
//! impl Response for GreetResponse {}
//!
//! #[derive(Default)]
//! struct GreetHandler;
//!
//! impl RequestHandler for GreetHandler {
//!     type Request = GreetRequest;
//!     type Response = GreetResponse;
//!
//!     fn handle(&mut self, request: &GreetRequest) -> Result<GreetResponse, HandlerFault> {
//!         Ok(GreetResponse {
//!             message: format!("hi {}", request.name),
//!         })
//!     }
//! }
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Scanner::new()
//!     .add_set(HandlerSet::new("core").register::<GreetHandler>())
//!     .scan()?;
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//!
//! let response = dispatcher.dispatch(&GreetRequest { name: "ada".into() })?;
//! assert_eq!(
//!     response.downcast_ref::<GreetResponse>().unwrap().message,
//!     "hi ada"
//! );
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
mod lifecycle;
pub mod message;
pub mod registry;
pub mod scan;

pub use config::{ConfigError, DuplicatePolicy, ScanPolicy};
pub use dispatch::{Dispatcher, OneWayInvocation, RequestInvocation};
pub use error::{DispatchError, ScanError};
pub use handler::{HandlerFault, OneWayHandler, RequestHandler};
pub use message::{OneWayRequest, Request, Response, TypeInfo};
pub use registry::{BindingInfo, HandlerKind, Registry};
pub use scan::{HandlerSet, Scanner};
