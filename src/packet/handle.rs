//! The owning, reference-counted smart handle onto one pool buffer.

use crate::packet::metadata::Metadata;
use crate::packet::pool::PoolState;
use std::sync::{Arc, Mutex};

struct Inner {
    pool: Arc<PoolState>,
    index: usize,
    metadata: Mutex<Metadata>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.pool.release(self.index);
    }
}

/// A reference-counted handle onto a buffer from a [`crate::packet::PacketPool`].
///
/// Cloning takes an additional reference ("ref" in the original vocabulary);
/// dropping the last clone returns the buffer to the pool's free list
/// ("unref"). See `crate::payload` for why this needs no separate
/// ref/unref bookkeeping beyond `Clone`/`Drop`.
#[derive(Clone)]
pub struct PacketHandle(Arc<Inner>);

impl PacketHandle {
    pub(crate) fn new(pool: Arc<PoolState>, index: usize, metadata: Metadata) -> Self {
        Self(Arc::new(Inner {
            pool,
            index,
            metadata: Mutex::new(metadata),
        }))
    }

    pub fn metadata(&self) -> Metadata {
        *self.0.metadata.lock().unwrap()
    }

    pub(crate) fn set_packet_id(&self, id: u8) {
        self.0.metadata.lock().unwrap().packet_id = id;
    }

    pub fn data(&self) -> &[u8] {
        self.0.pool.buffer(self.0.index)
    }

    /// Exclusive write access to the buffer, available only while this is
    /// the sole handle — `Arc::get_mut` is the exclusivity check.
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        let index = self.0.index;
        let inner = Arc::get_mut(&mut self.0)?;
        Some(inner.pool.buffer_mut(index))
    }

    /// Number of outstanding references to this buffer, including this one.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}
