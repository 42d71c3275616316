//! A directed edge from one [`crate::source::Source`] to one
//! [`crate::sink::Sink`].

use crate::sink::Sink;
use std::sync::Arc;

/// An immutable pairing of a source with a sink. Owned by either the static
/// registry (program lifetime) or a dynamic pool slot (lifetime from
/// `connect` to `disconnect`). A connection is linked into exactly one
/// source's list.
pub struct Connection<P, U = ()> {
    pub(crate) sink: Arc<Sink<P, U>>,
}

impl<P, U> Connection<P, U> {
    pub fn new(sink: Arc<Sink<P, U>>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<Sink<P, U>> {
        &self.sink
    }

    pub(crate) fn points_to(&self, sink: &Arc<Sink<P, U>>) -> bool {
        Arc::ptr_eq(&self.sink, sink)
    }
}
