use thiserror::Error;

use crate::types::SequenceNumber;

/// Errors that can occur during RPC ring buffer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The unacknowledged backlog of a reliable buffer exceeded its capacity.
    /// Accepting the push would silently destroy an unacknowledged payload,
    /// so the condition is surfaced to the caller instead.
    #[error(
        "Reliable ring buffer overflow: sequence {sequence} with ack mark {acked} exceeds capacity {capacity}"
    )]
    Overflow {
        sequence: SequenceNumber,
        acked: SequenceNumber,
        capacity: usize,
    },

    /// A ring buffer was configured with zero capacity
    #[error("Ring buffer capacity must be greater than zero")]
    InvalidCapacity,
}
