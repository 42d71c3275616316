//! Channel error types returned by `Sender`/`Receiver` operations.

/// The channel is disconnected: the other half has been dropped, so no more
/// values will ever be produced or consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryRecvError;

/// Failure to push a value into a channel.
#[derive(Debug)]
pub enum TrySendErr<T> {
    /// The channel is full; the value is handed back unchanged.
    Full(T),
    /// The receiver has been dropped; the value is handed back unchanged.
    Disconnected(T),
}
