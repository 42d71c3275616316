//! Zero-copy, reference-counted network buffers: a fixed pool hands out
//! [`PacketHandle`]s stamped with per-packet [`Metadata`], filtered at
//! delivery time by [`PacketFilter`].

mod handle;
mod metadata;
mod ops;
mod pool;

pub use handle::PacketHandle;
pub use metadata::{ANY, Metadata, Timestamp};
pub use ops::PacketFilter;
pub use pool::PacketPool;
