//! The distribution engine: `emit` fans a payload out to every sink wired
//! to a source, and `process`/`process_one` drain a queued sink's events.

use crate::error::Error;
use crate::payload::RefOutcome;
use crate::queue::Event;
use crate::sink::{Mode, Sink};
use crate::source::Source;
use crate::time::{Deadline, Timeout};
use tracing::{trace, warn};

/// Fan a payload out to every sink connected to `source`.
///
/// Returns the number of sinks that successfully accepted the payload.
/// Filtered-out sinks are skipped, not counted as delivered and not counted
/// as dropped. A single deadline is computed once, up front, from `timeout`;
/// each sink is given whatever budget remains on that deadline by the time
/// its turn comes (no minimum share is reserved for the last sink).
pub fn emit<P, U>(source: &Source<P, U>, payload: P, timeout: Timeout) -> Result<usize, Error>
where
    P: Clone,
{
    source.check_fan_out_allowed()?;
    #[cfg(feature = "stats")]
    source.stats().record_send();

    let deadline = timeout.deadline();
    let connections = source.snapshot();
    let mut delivered = 0usize;

    for connection in &connections {
        let sink = connection.sink();
        match deliver_one(source, sink, &payload, deadline.remaining()) {
            Ok(true) => delivered += 1,
            Ok(false) => {}
            Err(e) => {
                trace!(error = %e, "delivery to sink failed");
            }
        }
    }

    #[cfg(feature = "stats")]
    source.stats().record_delivered(delivered);

    Ok(delivered)
}

/// Deliver `payload` to a single `sink`, returning `Ok(true)` if it was
/// delivered, `Ok(false)` if it was filtered out (not an error), or an
/// `Err` for a sink-level failure (queue full, admission timeout).
fn deliver_one<P, U>(
    source: &Source<P, U>,
    sink: &Sink<P, U>,
    payload: &P,
    timeout: Timeout,
) -> Result<bool, Error>
where
    P: Clone,
{
    if let Some(ops) = source.ops() {
        match ops.admit(payload, sink) {
            RefOutcome::Skipped => return Ok(false),
            RefOutcome::Error(e) => {
                #[cfg(feature = "stats")]
                sink.stats().record_dropped();
                return Err(e);
            }
            RefOutcome::Delivered => {}
        }
    }

    let delivered = payload.clone();

    match sink.mode() {
        Mode::Immediate => {
            (sink.handler())(&delivered, sink.user_data());
            #[cfg(feature = "stats")]
            sink.stats().record_handled();
            Ok(true)
        }
        Mode::Queued(_) => deliver_queued(sink, delivered, timeout),
    }
}

fn deliver_queued<P, U>(sink: &Sink<P, U>, payload: P, timeout: Timeout) -> Result<bool, Error> {
    let Mode::Queued(queue) = sink.mode() else {
        return Err(Error::NotSupported);
    };
    // The Event needs an Arc<Sink> for process()/process_one() to find the
    // handler again at drain time; `sink.self_handle()` is the sink's own
    // reference-counted identity, registered once at construction.
    let event = Event {
        sink: sink.self_handle(),
        payload,
    };
    match queue.put(event, timeout) {
        Ok(()) => Ok(true),
        Err(e) => {
            #[cfg(feature = "stats")]
            sink.stats().record_dropped();
            Err(e)
        }
    }
}

/// Direct point-to-point delivery to `sink`, bypassing the connection
/// graph entirely. Honors the same admission/immediate/queued rules as
/// `emit`, given an explicit `ops` instead of a source's.
pub fn send_direct<P, U>(
    sink: &Sink<P, U>,
    payload: P,
    ops: Option<&dyn crate::payload::PayloadOps<P, U>>,
    timeout: Timeout,
) -> Result<bool, Error> {
    if let Some(ops) = ops {
        match ops.admit(&payload, sink) {
            RefOutcome::Skipped => return Ok(false),
            RefOutcome::Error(e) => return Err(e),
            RefOutcome::Delivered => {}
        }
    }
    match sink.mode() {
        Mode::Immediate => {
            (sink.handler())(&payload, sink.user_data());
            Ok(true)
        }
        Mode::Queued(queue) => {
            let event = Event {
                sink: sink.self_handle(),
                payload,
            };
            queue.put(event, timeout).map(|_| true)
        }
    }
}

/// Pop and handle at most one event from `queue`, honoring `timeout`.
/// Returns `Ok(false)` if nothing arrived (not an error).
pub fn process_one<P, U>(queue: &crate::queue::EventQueue<P, U>, timeout: Timeout) -> Result<bool, Error> {
    match queue.get(timeout)? {
        Some(event) => {
            run_event(event);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Drain `queue`: wait up to `timeout` for the first event, then greedily
/// handle any further events already buffered, non-blocking, within the
/// same deadline. Returns the number of events handled.
pub fn process<P, U>(queue: &crate::queue::EventQueue<P, U>, timeout: Timeout) -> Result<usize, Error> {
    let Some(first) = queue.get(timeout)? else {
        return Ok(0);
    };
    run_event(first);
    let mut count = 1;
    while let Some(event) = queue.try_get() {
        run_event(event);
        count += 1;
    }
    Ok(count)
}

fn run_event<P, U>(event: Event<P, U>) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        (event.sink.handler())(&event.payload, event.sink.user_data());
    }));
    #[cfg(feature = "stats")]
    event.sink.stats().record_handled();
    if let Err(panic) = result {
        warn!("sink handler panicked during drain");
        std::panic::resume_unwind(panic);
    }
    // event.payload drops here regardless of handler outcome above —
    // the "Released" state of the event state machine is unconditional.
}
