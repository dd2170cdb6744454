use thiserror::Error;

use crate::{partition::error::PartitionError, storage::error::StorageError};

/// Errors that can occur while driving the strategy coordinator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// An inbound update for a watched component could not be mirrored
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A partition lifecycle operation failed
    #[error(transparent)]
    Partition(#[from] PartitionError),
}
