//! Unified error handling for svclayer.
//!
//! Scan-time problems are configuration defects and surface before any
//! request flows; dispatch-time problems are either structural invariant
//! violations or faults propagated from handler code. Nothing in this crate
//! is retried.

use thiserror::Error;

use crate::handler::HandlerFault;
use crate::registry::HandlerKind;

// ============================================================================
// Scan Errors (registry population)
// ============================================================================

/// Errors surfaced while scanning handler sets into a registry.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Two handlers resolved to the same (request type, kind) pair while
    /// duplicates are rejected.
    #[error(
        "duplicate {kind} binding for {request}: {existing} is already registered, {incoming} conflicts"
    )]
    DuplicateBinding {
        /// Dispatch shape of the colliding bindings.
        kind: HandlerKind,
        /// The request type both handlers claim.
        request: &'static str,
        /// Handler registered first.
        existing: &'static str,
        /// Handler whose registration collided.
        incoming: &'static str,
    },
}

// ============================================================================
// Dispatch Errors (invocation boundary)
// ============================================================================

/// Errors surfaced while resolving or invoking a handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No binding exists for the request type.
    #[error("no handler bound for request type {request}")]
    HandlerNotFound {
        /// The request type that failed to resolve.
        request: &'static str,
    },

    /// The erased request does not match the resolved handler's bound
    /// request type. This is a wiring defect between routing and registry,
    /// not a transient failure.
    #[error("request type mismatch: {handler} is bound to {expected}")]
    RequestTypeMismatch {
        /// The handler that received the foreign request.
        handler: &'static str,
        /// The request type the handler is bound to.
        expected: &'static str,
    },

    /// Fault propagated unchanged from the handler's `handle` step.
    /// `after_handle` was skipped; disposal still ran.
    #[error("handler failed: {0}")]
    Handler(#[source] HandlerFault),
}

impl DispatchError {
    /// Static error code for metrics and log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HandlerNotFound { .. } => "handler_not_found",
            Self::RequestTypeMismatch { .. } => "request_type_mismatch",
            Self::Handler(_) => "handler_fault",
        }
    }
}
