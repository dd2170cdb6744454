use thiserror::Error;

use crate::types::PartitionHandle;

/// Errors that can occur during partition lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// The identifier pool has not finished reserving an id range yet
    #[error("Partition id pool is not ready")]
    PoolNotReady,

    /// The identifier space backing partition allocation is exhausted
    #[error("Partition id pool is exhausted")]
    IdsExhausted,

    /// The handle does not name a live partition
    #[error("Unknown partition handle {handle:?}")]
    UnknownPartition { handle: PartitionHandle },
}
