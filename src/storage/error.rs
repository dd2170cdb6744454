use thiserror::Error;

use crate::{types::ComponentId, wire::error::WireError};

/// Errors that can occur while mirroring inbound component state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// An inbound update for a watched component failed to decode.
    /// Surfaced to the caller (transport error); the mirror is untouched.
    #[error("Malformed update for component {component_id}: {source}")]
    Malformed {
        component_id: ComponentId,
        source: WireError,
    },
}
