//! Static connection registration and the one-time startup wiring pass.
//!
//! Other modules submit [`StaticConnection`] records via `inventory::submit!`
//! (after calling [`declare_static_registry!`] once per concrete payload
//! type); [`wire_static`] walks the collected records in `init_priority`
//! order and links each into its source's connection list exactly once.

use crate::connection::Connection;
use crate::sink::Sink;
use crate::source::Source;
use std::sync::Arc;
use tracing::warn;

/// One statically declared edge: functions returning the source and sink to
/// link, plus an ordering key. `None` models the embedded original's "null
/// source/sink" case — here, a record whose backing `OnceLock`/`LazyLock`
/// has not yet been initialized by the time wiring runs; it is logged and
/// skipped rather than treated as fatal.
pub struct StaticConnection<P, U = ()> {
    pub source: fn() -> Option<&'static Source<P, U>>,
    pub sink: fn() -> Option<&'static Arc<Sink<P, U>>>,
    pub init_priority: i32,
}

impl<P, U> StaticConnection<P, U> {
    pub const fn new(
        source: fn() -> Option<&'static Source<P, U>>,
        sink: fn() -> Option<&'static Arc<Sink<P, U>>>,
    ) -> Self {
        Self {
            source,
            sink,
            init_priority: 0,
        }
    }

    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.init_priority = priority;
        self
    }
}

/// Register `StaticConnection<$payload, $user_data>` (user-data defaults to
/// `()`) for `inventory` collection. Call once per concrete payload type
/// used with static wiring, anywhere in the crate that declares such
/// connections, before any `inventory::submit!` for that pair. Requires
/// `inventory` as a direct dependency of the calling crate.
#[macro_export]
macro_rules! declare_static_registry {
    ($payload:ty, $user_data:ty) => {
        inventory::collect!($crate::init::StaticConnection<$payload, $user_data>);
    };
    ($payload:ty) => {
        $crate::declare_static_registry!($payload, ());
    };
}

/// Walk every statically registered connection for payload type `(P, U)`, in
/// `init_priority` order (ties broken by discovery order, since the sort is
/// stable), linking each into its source's list. Idempotent to call more
/// than once only in the sense that re-linking the same sink a second time
/// produces a duplicate entry in the source's list — callers are expected
/// to call this exactly once per `(P, U)` at program start.
pub fn wire_static<P, U>()
where
    StaticConnection<P, U>: inventory::Collect,
{
    let mut records: Vec<&'static StaticConnection<P, U>> =
        inventory::iter::<StaticConnection<P, U>>().collect();
    records.sort_by_key(|r| r.init_priority);

    for record in records {
        match ((record.source)(), (record.sink)()) {
            (Some(source), Some(sink)) => {
                source.link(Arc::new(Connection::new(sink.clone())));
            }
            _ => {
                warn!("skipping static connection with uninitialized source or sink");
            }
        }
    }
}
