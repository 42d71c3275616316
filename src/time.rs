//! Timeout vocabulary shared by every blocking operation in the fabric:
//! `emit`, queue drain, observable `claim`, and synchronous RPC waits.

use std::time::{Duration, Instant};

/// A caller-chosen wait budget for a single blocking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Don't block at all; fail immediately if the operation can't complete.
    NonBlocking,
    /// Block for at most the given duration.
    After(Duration),
    /// Block until the operation completes, however long that takes.
    Indefinite,
}

impl Timeout {
    pub const fn zero() -> Self {
        Timeout::NonBlocking
    }

    /// A single deadline computed once at the start of a fan-out, from which
    /// each sink's remaining budget is derived.
    pub fn deadline(self) -> Deadline {
        match self {
            Timeout::NonBlocking => Deadline::NonBlocking,
            Timeout::Indefinite => Deadline::Indefinite,
            Timeout::After(d) => Deadline::At(Instant::now() + d),
        }
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        if d.is_zero() {
            Timeout::NonBlocking
        } else {
            Timeout::After(d)
        }
    }
}

/// A deadline computed once at the top of `emit` and consulted once per
/// sink. Unlike [`Timeout`], this is anchored to a fixed instant so that
/// "remaining time" shrinks monotonically across a fan-out instead of
/// restarting a fresh budget for every sink.
#[derive(Debug, Clone, Copy)]
pub enum Deadline {
    NonBlocking,
    At(Instant),
    Indefinite,
}

impl Deadline {
    /// The timeout a single sink should be given right now: whatever is left
    /// on the clock, or non-blocking once the deadline has passed.
    pub fn remaining(self) -> Timeout {
        match self {
            Deadline::NonBlocking => Timeout::NonBlocking,
            Deadline::Indefinite => Timeout::Indefinite,
            Deadline::At(at) => {
                let now = Instant::now();
                if now >= at {
                    Timeout::NonBlocking
                } else {
                    Timeout::After(at - now)
                }
            }
        }
    }
}
