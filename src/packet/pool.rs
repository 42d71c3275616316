//! A fixed-size pool of reusable packet buffers behind a free-list mutex.

use crate::error::Error;
use crate::packet::handle::PacketHandle;
use crate::packet::metadata;
use crate::time::Timeout;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::sync::atomic::AtomicU16;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Instant;

struct Slot {
    buffer: UnsafeCell<Box<[u8]>>,
}

// Each slot's buffer is only ever borrowed through `PoolState::buffer`/
// `buffer_mut`, which hand out aliased access exactly the way the owning
// `PacketHandle`'s `Arc` ref-count allows (see `packet::handle`).
unsafe impl Sync for Slot {}

pub(crate) struct PoolState {
    slots: Vec<Slot>,
    free: Mutex<Vec<usize>>,
    not_empty: Condvar,
    counter: CachePadded<AtomicU16>,
}

impl PoolState {
    pub(crate) fn release(&self, index: usize) {
        self.free.lock().unwrap().push(index);
        self.not_empty.notify_one();
    }

    pub(crate) fn buffer(&self, index: usize) -> &[u8] {
        unsafe { &*self.slots[index].buffer.get() }
    }

    pub(crate) fn buffer_mut(&self, index: usize) -> &mut [u8] {
        unsafe { &mut *self.slots[index].buffer.get() }
    }
}

/// A fixed-size pool of `count` buffers, each `buffer_len` bytes, reused
/// across allocations rather than heap-allocated per packet.
pub struct PacketPool {
    state: Arc<PoolState>,
}

impl PacketPool {
    pub fn new(count: usize, buffer_len: usize) -> Self {
        let slots = (0..count)
            .map(|_| Slot {
                buffer: UnsafeCell::new(vec![0u8; buffer_len].into_boxed_slice()),
            })
            .collect();
        Self {
            state: Arc::new(PoolState {
                slots,
                free: Mutex::new((0..count).collect()),
                not_empty: Condvar::new(),
                counter: CachePadded::new(AtomicU16::new(0)),
            }),
        }
    }

    /// Take a buffer from the pool, stamped with a fresh counter value and
    /// `packet_id = ANY`.
    pub fn alloc(&self, timeout: Timeout) -> Result<PacketHandle, Error> {
        let index = self.acquire(timeout)?;
        let metadata = metadata::stamp(&self.state.counter);
        Ok(PacketHandle::new(self.state.clone(), index, metadata))
    }

    /// Like `alloc`, additionally stamping `packet_id`.
    pub fn alloc_with_id(&self, id: u8, timeout: Timeout) -> Result<PacketHandle, Error> {
        let handle = self.alloc(timeout)?;
        handle.set_packet_id(id);
        Ok(handle)
    }

    pub fn capacity(&self) -> usize {
        self.state.slots.len()
    }

    pub fn available(&self) -> usize {
        self.state.free.lock().unwrap().len()
    }

    fn acquire(&self, timeout: Timeout) -> Result<usize, Error> {
        let mut free = self.state.free.lock().unwrap();
        match timeout {
            Timeout::NonBlocking => free.pop().ok_or(Error::OutOfMemory),
            Timeout::Indefinite => {
                while free.is_empty() {
                    free = self.state.not_empty.wait(free).unwrap();
                }
                Ok(free.pop().expect("just observed non-empty free list"))
            }
            Timeout::After(d) => {
                let deadline = Instant::now() + d;
                while free.is_empty() {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(Error::OutOfMemory);
                    }
                    let (guard, result) = self
                        .state
                        .not_empty
                        .wait_timeout(free, remaining)
                        .unwrap();
                    free = guard;
                    if result.timed_out() && free.is_empty() {
                        return Err(Error::OutOfMemory);
                    }
                }
                Ok(free.pop().expect("just observed non-empty free list"))
            }
        }
    }
}
