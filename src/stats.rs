//! Per-source and per-sink counters, gated behind the `stats` feature.
//!
//! Counters are monotone, single-word atomics, matching the
//! `CachePadded<AtomicUsize>` cursors in `spsc::channel::Channel`: each
//! counter gets its own cache line so a source's send-rate counter never
//! thrashes the cache line of a sink's drop counter it fans out to.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counter(CachePadded<AtomicU64>);

impl Counter {
    fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Counters owned by a [`crate::source::Source`].
#[derive(Default)]
pub struct SourceStats {
    send_count: Counter,
    delivered_total: Counter,
}

impl SourceStats {
    pub fn record_send(&self) {
        self.send_count.incr();
    }

    pub fn record_delivered(&self, n: usize) {
        for _ in 0..n {
            self.delivered_total.incr();
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.get()
    }

    pub fn delivered_total(&self) -> u64 {
        self.delivered_total.get()
    }

    pub fn reset(&self) {
        self.send_count.reset();
        self.delivered_total.reset();
    }
}

/// Counters owned by a [`crate::sink::Sink`].
#[derive(Default)]
pub struct SinkStats {
    handled_count: Counter,
    dropped_count: Counter,
}

impl SinkStats {
    pub fn record_handled(&self) {
        self.handled_count.incr();
    }

    pub fn record_dropped(&self) {
        self.dropped_count.incr();
    }

    pub fn handled_count(&self) -> u64 {
        self.handled_count.get()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.get()
    }

    pub fn reset(&self) {
        self.handled_count.reset();
        self.dropped_count.reset();
    }
}
