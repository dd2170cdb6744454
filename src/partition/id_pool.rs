use crate::{partition::error::PartitionError, types::EntityId};

/// Source of entity identifiers for new partitions.
///
/// The real pool is a service of the surrounding runtime that reserves id
/// ranges asynchronously; readiness is polled, never announced. `next` may
/// only be called once `is_ready` reports true.
pub trait IdPool {
    fn is_ready(&self) -> bool;

    fn next(&mut self) -> Result<EntityId, PartitionError>;
}

/// A pool over a fixed pre-reserved range. Always ready; errs when the
/// range runs out.
#[derive(Clone, Debug)]
pub struct CounterIdPool {
    next: EntityId,
    last: EntityId,
}

impl CounterIdPool {
    /// `first..=last`, inclusive on both ends.
    pub fn new(first: EntityId, last: EntityId) -> Self {
        Self { next: first, last }
    }

    pub fn remaining(&self) -> u64 {
        if self.next > self.last {
            0
        } else {
            self.last - self.next + 1
        }
    }
}

impl IdPool for CounterIdPool {
    fn is_ready(&self) -> bool {
        true
    }

    fn next(&mut self) -> Result<EntityId, PartitionError> {
        if self.next > self.last {
            return Err(PartitionError::IdsExhausted);
        }
        let id = self.next;
        self.next += 1;
        Ok(id)
    }
}
