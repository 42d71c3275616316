//! Receive endpoints: a handler plus an execution mode.

use crate::queue::EventQueue;
#[cfg(feature = "stats")]
use crate::stats::SinkStats;
use std::sync::{Arc, Weak};

/// How a [`Sink`] runs its handler relative to the emitter's call to
/// [`crate::source::Source::emit`].
pub enum Mode<P, U = ()> {
    /// The handler runs synchronously, in the emitter's own thread, during
    /// `emit`.
    Immediate,
    /// Delivery pushes an [`crate::queue::Event`] onto this bounded queue;
    /// a consumer thread later pops it and runs the handler.
    Queued(EventQueue<P, U>),
}

/// A handler invoked once per delivered payload, with the sink's own
/// user-data.
pub type Handler<P, U> = dyn Fn(&P, &U) + Send + Sync;

/// A receive endpoint: a handler, its user-data, and an execution mode.
///
/// `U` is the user-data type threaded through to the handler on every call;
/// use `()` for handlers that close over everything they need.
pub struct Sink<P, U = ()> {
    #[cfg(feature = "names")]
    name: &'static str,
    user_data: U,
    handler: Arc<Handler<P, U>>,
    mode: Mode<P, U>,
    #[cfg(feature = "stats")]
    stats: SinkStats,
    /// A weak self-reference so `Event`s recorded at delivery time can carry
    /// an owning `Arc<Sink<P, U>>` without the caller threading one through.
    self_ref: Weak<Sink<P, U>>,
}

impl<P, U> Sink<P, U> {
    /// Construct an immediate-mode sink: the handler runs on the emitter's
    /// thread.
    pub fn immediate(
        #[cfg(feature = "names")] name: &'static str,
        user_data: U,
        handler: impl Fn(&P, &U) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            #[cfg(feature = "names")]
            name,
            user_data,
            handler: Arc::new(handler),
            mode: Mode::Immediate,
            #[cfg(feature = "stats")]
            stats: SinkStats::default(),
            self_ref: self_ref.clone(),
        })
    }

    /// Construct a queued-mode sink: delivery enqueues an event of the given
    /// bounded `capacity`; a separate consumer must call
    /// [`crate::engine::process`] or [`crate::engine::process_one`] to drain
    /// it.
    pub fn queued(
        #[cfg(feature = "names")] name: &'static str,
        user_data: U,
        handler: impl Fn(&P, &U) + Send + Sync + 'static,
        capacity: usize,
    ) -> Arc<Self> {
        Self::queued_on(
            #[cfg(feature = "names")]
            name,
            user_data,
            handler,
            EventQueue::bounded(capacity),
        )
    }

    /// Construct a queued-mode sink backed by an existing, possibly-shared
    /// [`EventQueue`] — how a "shared per-module queue drained by a worker"
    /// (used by [`crate::method::Method`]) is wired up: several sinks can be
    /// constructed with clones of the same queue.
    pub fn queued_on(
        #[cfg(feature = "names")] name: &'static str,
        user_data: U,
        handler: impl Fn(&P, &U) + Send + Sync + 'static,
        queue: EventQueue<P, U>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            #[cfg(feature = "names")]
            name,
            user_data,
            handler: Arc::new(handler),
            mode: Mode::Queued(queue),
            #[cfg(feature = "stats")]
            stats: SinkStats::default(),
            self_ref: self_ref.clone(),
        })
    }

    /// This sink's own reference-counted identity, used to tag queued
    /// events so a drain loop can find the handler again. Panics if called
    /// before the `Arc::new_cyclic` constructor finishes (never observable
    /// from outside this module).
    pub(crate) fn self_handle(&self) -> Arc<Sink<P, U>> {
        self.self_ref
            .upgrade()
            .expect("Sink is always held behind the Arc created by its constructor")
    }

    pub fn mode(&self) -> &Mode<P, U> {
        &self.mode
    }

    pub fn user_data(&self) -> &U {
        &self.user_data
    }

    pub fn handler(&self) -> &Arc<Handler<P, U>> {
        &self.handler
    }

    pub fn is_queued(&self) -> bool {
        matches!(self.mode, Mode::Queued(_))
    }

    #[cfg(feature = "names")]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &SinkStats {
        &self.stats
    }
}
