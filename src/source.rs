//! Producer endpoints: a list of outgoing connections, optional payload
//! ops, and a lock covering list mutation.

use crate::connection::Connection;
use crate::error::Error;
use crate::payload::PayloadOps;
#[cfg(feature = "stats")]
use crate::stats::SourceStats;
use crate::spinlock::Spinlock;
use std::sync::Arc;

/// A producer endpoint. Generic over the payload type `P` and the per-sink
/// user-data type `U` it fans out to.
pub struct Source<P, U = ()> {
    #[cfg(feature = "names")]
    name: &'static str,
    ops: Option<Arc<dyn PayloadOps<P, U>>>,
    connections: Spinlock<Vec<Arc<Connection<P, U>>>>,
    #[cfg(feature = "stats")]
    stats: SourceStats,
}

impl<P, U> Source<P, U> {
    /// A source with no payload ops: fan-out is restricted to a single
    /// sink, since there is no way to count references to a payload beyond
    /// the one handed to the first sink.
    pub fn single_sink(#[cfg(feature = "names")] name: &'static str) -> Self {
        Self {
            #[cfg(feature = "names")]
            name,
            ops: None,
            connections: Spinlock::new(Vec::new()),
            #[cfg(feature = "stats")]
            stats: SourceStats::default(),
        }
    }

    /// A source that can fan out to any number of sinks, using `ops` to
    /// take and release references on each delivered payload.
    pub fn fan_out(
        #[cfg(feature = "names")] name: &'static str,
        ops: Arc<dyn PayloadOps<P, U>>,
    ) -> Self {
        Self {
            #[cfg(feature = "names")]
            name,
            ops: Some(ops),
            connections: Spinlock::new(Vec::new()),
            #[cfg(feature = "stats")]
            stats: SourceStats::default(),
        }
    }

    pub fn ops(&self) -> Option<&Arc<dyn PayloadOps<P, U>>> {
        self.ops.as_ref()
    }

    #[cfg(feature = "names")]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &SourceStats {
        &self.stats
    }

    /// Link a new connection into this source's list.
    pub fn link(&self, connection: Arc<Connection<P, U>>) {
        self.connections.lock().push(connection);
    }

    /// Remove the connection targeting `sink`, if any, returning it.
    pub fn unlink(&self, sink: &Arc<crate::sink::Sink<P, U>>) -> Option<Arc<Connection<P, U>>> {
        let mut list = self.connections.lock();
        let idx = list.iter().position(|c| c.points_to(sink))?;
        Some(list.remove(idx))
    }

    pub fn has_connection(&self, sink: &Arc<crate::sink::Sink<P, U>>) -> bool {
        self.connections.lock().iter().any(|c| c.points_to(sink))
    }

    /// Snapshot the connection list under the lock, then release it. The
    /// lock is never held across handler invocations — see
    /// `engine::emit`.
    pub(crate) fn snapshot(&self) -> Vec<Arc<Connection<P, U>>> {
        self.connections.lock().clone()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Validate the "ops-less sources may only have one sink" invariant
    /// ahead of a fan-out attempt.
    pub(crate) fn check_fan_out_allowed(&self) -> Result<(), Error> {
        if self.ops.is_none() && self.connection_count() > 1 {
            return Err(Error::InvalidArgument(
                "source without PayloadOps cannot fan out to more than one sink",
            ));
        }
        Ok(())
    }
}
