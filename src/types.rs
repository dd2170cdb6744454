pub type EntityId = u64;
pub type WorkerId = u32;
pub type ComponentId = u32;
pub type SequenceNumber = u64;

/// Opaque identifier for a unit of delegable authority.
///
/// Handles are minted by the `PartitionManager`; `from_raw` exists because
/// intent/delegation components carry the handle on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionHandle(u64);

impl PartitionHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reliability {
    Reliable,
    Unreliable,
}
