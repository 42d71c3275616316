//! An embedded, in-process message-passing fabric: producers ("sources")
//! and consumers ("sinks") wired by statically or dynamically declared
//! connections, distributing typed payloads through a shared distribution
//! engine that governs when each payload is released.
//!
//! Three higher-level primitives build on the core source/sink/engine
//! triad:
//! - [`packet`] — reference-counted buffers from a fixed pool, filtered by
//!   id at delivery time.
//! - [`observable`] — validated state cells that notify subscribers on
//!   change.
//! - [`method`] — typed request/response calls carried over a sink.
//!
//! # Features
//! - `names` — compile in `&'static str` names on sources/sinks for
//!   diagnostics.
//! - `stats` — per-source/per-sink counters.
//! - `runtime-connections` — mutable connect/disconnect against a
//!   fixed-capacity pool, on top of the static wiring in [`init`].
//! - `runtime-stack-check` — an additional (vacuous in this rendition, see
//!   [`registry`]) assertion on `connect`.
//! - `packet-timestamp-hires` — widen packet timestamps to 64-bit.
//! - `async` — `futures`-based async variants alongside the synchronous
//!   primitives (enabled by default).

mod ring;
mod spinlock;

pub mod spsc;

pub mod connection;
pub mod engine;
pub mod error;
pub mod init;
pub mod method;
pub mod observable;
pub mod packet;
pub mod payload;
pub mod queue;
pub mod sink;
pub mod source;
pub mod time;

#[cfg(feature = "runtime-connections")]
pub mod registry;

#[cfg(feature = "stats")]
pub mod stats;

pub use connection::Connection;
pub use engine::{emit, process, process_one, send_direct};
pub use error::{Error, Result};
pub use init::{StaticConnection, wire_static};
pub use method::{CallContext, Method, PendingCall};
pub use observable::{Observable, ObservableGuard};
pub use packet::{ANY, PacketFilter, PacketHandle, PacketPool};
pub use payload::{NoopOps, PayloadOps, RefOutcome};
pub use queue::EventQueue;
pub use sink::{Mode, Sink};
pub use source::Source;
pub use time::{Deadline, Timeout};

#[cfg(feature = "runtime-connections")]
pub use registry::{ConnectionHandle, ConnectionRegistry};
