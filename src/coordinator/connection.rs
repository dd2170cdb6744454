use crate::storage::inbound::{ComponentUpdate, InboundChange};

/// The connection of the surrounding runtime, as seen by the coordinator.
///
/// Non-blocking by contract: `drain_changes` hands over whatever arrived
/// since the previous tick for the watched component kinds, and updates
/// enqueued through `send_update` are flushed atomically per tick by the
/// host runtime.
pub trait WorkerConnection {
    fn drain_changes(&mut self) -> Vec<InboundChange>;

    fn send_update(&mut self, update: ComponentUpdate);
}
