//! Bounded event queues used by queued-mode sinks.
//!
//! The crate's own `spsc` ring buffer is single-producer; a queued
//! [`crate::sink::Sink`] must accept deliveries from every source connected
//! to it, which in general means multiple concurrent producers. Rather than
//! hand-roll a lock-free MPMC ring buffer, this module generalizes the
//! bounded-channel *contract* `spsc` already has (non-blocking / bounded-wait
//! / indefinite `put`, analogous `get`) onto `flume`, already a dependency
//! and built exactly for this job.

use crate::error::Error;
use crate::sink::Sink;
use crate::time::Timeout;
use std::sync::Arc;
use std::time::Duration;

/// A queued delivery record: exactly the information needed to replay an
/// immediate delivery at drain time. The payload is an owned clone taken at
/// admission time ("ref"); dropping the event after the handler runs
/// ("unref") is what releases it — see `crate::payload` for why this needs
/// no separate ops bookkeeping.
pub struct Event<P, U = ()> {
    pub(crate) sink: Arc<Sink<P, U>>,
    pub(crate) payload: P,
}

/// A bounded, multi-producer, multi-consumer queue of [`Event`]s.
///
/// Cloning an `EventQueue` is cheap and yields a handle to the same
/// underlying channel — this is how a "shared per-module queue drained by a
/// worker" (used by [`crate::method::Method`]) is expressed: construct one
/// `EventQueue` and hand clones of it to every sink that should share it.
pub struct EventQueue<P, U = ()> {
    tx: flume::Sender<Event<P, U>>,
    rx: flume::Receiver<Event<P, U>>,
}

impl<P, U> Clone for EventQueue<P, U> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<P, U> EventQueue<P, U> {
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = flume::bounded(capacity.max(1));
        Self { tx, rx }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.tx.capacity()
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Admit an event within `timeout`. On success the event's `unref` is
    /// deferred to whoever drains it; on failure the caller is responsible
    /// for unref'ing immediately.
    pub(crate) fn put(&self, event: Event<P, U>, timeout: Timeout) -> Result<(), Error> {
        match timeout {
            Timeout::NonBlocking => self.tx.try_send(event).map_err(|_| Error::QueueFull),
            Timeout::After(d) => self
                .tx
                .send_timeout(event, d)
                .map_err(|_| Error::QueueFull),
            Timeout::Indefinite => self.tx.send(event).map_err(|_| Error::QueueFull),
        }
    }

    /// Pop a single event within `timeout`. `Ok(None)` means nothing arrived
    /// before the deadline — not an error.
    pub(crate) fn get(&self, timeout: Timeout) -> Result<Option<Event<P, U>>, Error> {
        match timeout {
            Timeout::NonBlocking => match self.rx.try_recv() {
                Ok(e) => Ok(Some(e)),
                Err(flume::TryRecvError::Empty) => Ok(None),
                Err(flume::TryRecvError::Disconnected) => Ok(None),
            },
            Timeout::After(d) => match self.rx.recv_timeout(d) {
                Ok(e) => Ok(Some(e)),
                Err(flume::RecvTimeoutError::Timeout) => Ok(None),
                Err(flume::RecvTimeoutError::Disconnected) => Ok(None),
            },
            Timeout::Indefinite => match self.rx.recv() {
                Ok(e) => Ok(Some(e)),
                Err(flume::RecvError::Disconnected) => Ok(None),
            },
        }
    }

    /// Pop any event currently buffered, without waiting.
    pub(crate) fn try_get(&self) -> Option<Event<P, U>> {
        self.rx.try_recv().ok()
    }
}

impl<P, U> Default for EventQueue<P, U> {
    fn default() -> Self {
        Self::bounded(16)
    }
}
