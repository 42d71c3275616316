//! Pluggable payload admission: the only thing the distribution engine knows
//! about a payload is whether to admit it to a given sink. Reference
//! counting itself is not reimplemented here — a delivered payload is an
//! owned `P: Clone`, and "ref" is simply `payload.clone()`; "unref" is
//! simply letting that clone drop. This is the idiomatic-Rust rendering of
//! the design note "express as an owning smart handle with a destructor
//! callback, not as a raw pointer plus manual ref/unref": for an
//! `Arc`-backed `P`, `Clone` bumps the strong count and `Drop` runs the
//! destructor on last release, with no separate bookkeeping required, and
//! no possibility of an ops/unref mismatch (invariant 6) since the release
//! behavior is a property of `P`'s `Drop` impl, not of a particular
//! `PayloadOps` instance.

use crate::sink::Sink;

/// The result of attempting to admit a payload for delivery to a sink. A
/// three-valued return (rather than a negative-number discriminant) so that
/// "filtered out" can never be confused with a real error.
pub enum RefOutcome {
    /// The sink accepts the payload; the engine will clone it and proceed
    /// with delivery.
    Delivered,
    /// The sink's filter rejected this payload. Not an error, not counted as
    /// a drop, no clone is taken.
    Skipped,
    /// Admission failed for a reason other than filtering. Counts as a
    /// dropped delivery for that sink.
    Error(crate::error::Error),
}

/// A pluggable admission/filter check for a payload family.
///
/// A [`crate::source::Source`] holds at most one `Arc<dyn PayloadOps<P, U>>`.
/// When it holds none, the source may only be connected to a single sink:
/// with no admission policy to consult, fan-out to multiple sinks is
/// disallowed by convention (see `Source::check_fan_out_allowed`).
pub trait PayloadOps<P, U = ()>: Send + Sync {
    /// Decide whether `payload` should be delivered to `sink`.
    fn admit(&self, payload: &P, sink: &Sink<P, U>) -> RefOutcome;
}

/// A [`PayloadOps`] that always admits, suitable for payloads needing no
/// filtering of their own (e.g. an [`crate::observable::Observable`]'s
/// internal source). Its mere presence (as `Some(..)`) is what lets a
/// source bypass the "single sink without ops" restriction.
pub struct NoopOps;

impl<P, U> PayloadOps<P, U> for NoopOps {
    fn admit(&self, _payload: &P, _sink: &Sink<P, U>) -> RefOutcome {
        RefOutcome::Delivered
    }
}
