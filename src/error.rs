//! Crate-wide error taxonomy.
//!
//! Every distinguished failure code named by the fabric's contract surfaces
//! through this one enum. Filter mismatches are deliberately **not** a
//! variant here — they are an internal [`crate::payload::RefOutcome`] and
//! never reach a caller as an `Err`.

use thiserror::Error;

/// Errors returned by the distribution engine, registry, packets,
/// observables and RPC methods.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A caller-supplied argument violates a precondition: a source with no
    /// [`crate::payload::PayloadOps`] wired to more than one sink, a
    /// malformed packet metadata block, a size mismatch, and so on.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A queued delivery could not be admitted within the sink's remaining
    /// timeout budget.
    #[error("sink queue is full")]
    QueueFull,

    /// The sink's execution mode does not support the attempted delivery.
    /// Reserved for future sink kinds; unreachable with the two modes this
    /// crate ships (`Immediate`, `Queued`).
    #[error("sink does not support this delivery mode")]
    NotSupported,

    /// A blocking wait (drain, async completion) expired before anything
    /// arrived.
    #[error("operation timed out")]
    Timeout,

    /// `connect` was called for a (source, sink) pair that is already wired.
    #[error("connection already exists")]
    AlreadyConnected,

    /// `disconnect` targeted a (source, sink) pair that is not wired.
    #[error("no matching connection")]
    NoEntry,

    /// The dynamic connection pool has no free slots.
    #[error("connection pool exhausted")]
    OutOfMemory,

    /// An RPC handler ran to completion and returned an application-level
    /// negative result code.
    #[error("handler returned failure code {0}")]
    HandlerFailed(i32),

    /// Reserved for the observable/register-bridge external collaborator: a
    /// write was attempted against a read-only field. Not raised by any
    /// in-crate code path.
    #[error("permission denied")]
    PermissionDenied,

    /// Reserved for the observable/register-bridge external collaborator: a
    /// field is read-only. Not raised by any in-crate code path.
    #[error("field is read-only")]
    ReadOnly,
}

pub type Result<T> = std::result::Result<T, Error>;
