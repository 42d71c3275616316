//! ID-based admission filter for packet sinks.

use crate::packet::handle::PacketHandle;
use crate::packet::metadata::ANY;
use crate::payload::{PayloadOps, RefOutcome};
use crate::sink::Sink;

/// Filters packets by `packet_id` before admitting them to a sink.
///
/// The filter value itself lives on the sink, not on this ops instance — a
/// `Sink<PacketHandle, u8>`'s user-data *is* the id it's bound to, with
/// `ANY` meaning "accept every packet". This lets one `PacketFilter`
/// instance serve every sink on a fan-out source, each bound to a different
/// id.
pub struct PacketFilter;

impl PayloadOps<PacketHandle, u8> for PacketFilter {
    fn admit(&self, payload: &PacketHandle, sink: &Sink<PacketHandle, u8>) -> RefOutcome {
        let bound = *sink.user_data();
        let got = payload.metadata().packet_id;
        if bound == ANY || got == bound {
            RefOutcome::Delivered
        } else {
            RefOutcome::Skipped
        }
    }
}
