//! Per-packet metadata trailing the payload buffer.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

#[cfg(feature = "packet-timestamp-hires")]
pub type Timestamp = u64;
#[cfg(not(feature = "packet-timestamp-hires"))]
pub type Timestamp = u32;

/// Sentinel `packet_id` meaning "no filter": a sink bound to `ANY` accepts
/// every packet regardless of the id stamped on it.
pub const ANY: u8 = 0xFF;

/// `[u8 packet_id][u8 client_id][u16 counter][u32 or u64 timestamp]`,
/// consecutive fields, natural alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub packet_id: u8,
    pub client_id: u8,
    pub counter: u16,
    pub timestamp: Timestamp,
}

impl Metadata {
    /// An all-zero block is the "uninitialized" pattern. Since only
    /// `PacketPool::alloc`/`alloc_with_id` can construct a [`crate::packet::PacketHandle`],
    /// this never fires in practice; it exists to guard against buffers
    /// obtained any other way, and is exercised only by a unit test that
    /// pokes the pattern directly.
    pub fn is_initialized(&self) -> bool {
        !(self.packet_id == 0 && self.client_id == 0 && self.counter == 0 && self.timestamp == 0)
    }
}

pub(super) fn stamp(counter: &AtomicU16) -> Metadata {
    Metadata {
        packet_id: ANY,
        client_id: 0,
        counter: counter.fetch_add(1, Ordering::Relaxed),
        timestamp: now(),
    }
}

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

#[cfg(not(feature = "packet-timestamp-hires"))]
fn now() -> Timestamp {
    epoch().elapsed().as_millis() as u32
}

#[cfg(feature = "packet-timestamp-hires")]
fn now() -> Timestamp {
    epoch().elapsed().as_nanos() as u64
}
