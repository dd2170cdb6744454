use std::collections::HashMap;

use log::warn;

use crate::{
    partition::{error::PartitionError, id_pool::IdPool},
    types::{PartitionHandle, WorkerId},
};

#[derive(Clone, Debug, Default)]
struct PartitionRecord {
    worker: Option<WorkerId>,
}

/// Owns the lifecycle of partitions, each one unit of authority assignable
/// to a worker. Handles are minted here and nowhere else.
pub struct PartitionManager {
    pool: Box<dyn IdPool>,
    partitions: HashMap<PartitionHandle, PartitionRecord>,
}

impl PartitionManager {
    pub fn new(pool: Box<dyn IdPool>) -> Self {
        Self {
            pool,
            partitions: HashMap::new(),
        }
    }

    /// Creates a new partition with no assigned worker. Fails only when the
    /// backing identifier pool is unavailable or exhausted.
    pub fn allocate(&mut self) -> Result<PartitionHandle, PartitionError> {
        if !self.pool.is_ready() {
            return Err(PartitionError::PoolNotReady);
        }
        let handle = PartitionHandle::from_raw(self.pool.next()?);
        self.partitions.insert(handle, PartitionRecord::default());
        Ok(handle)
    }

    /// Sets the partition's worker, returning the previous assignment.
    /// Overwriting an existing assignment is how a confirmed handoff takes
    /// effect.
    pub fn assign(
        &mut self,
        handle: PartitionHandle,
        worker: WorkerId,
    ) -> Result<Option<WorkerId>, PartitionError> {
        let record = self
            .partitions
            .get_mut(&handle)
            .ok_or(PartitionError::UnknownPartition { handle })?;
        Ok(record.worker.replace(worker))
    }

    /// Clears the partition's worker assignment.
    pub fn release(&mut self, handle: PartitionHandle) -> Result<(), PartitionError> {
        let record = self
            .partitions
            .get_mut(&handle)
            .ok_or(PartitionError::UnknownPartition { handle })?;
        if record.worker.take().is_none() {
            warn!("Released partition {:?} which had no assigned worker", handle);
        }
        Ok(())
    }

    /// Frees the partition. The caller guarantees no entity still depends
    /// on it.
    pub fn destroy(&mut self, handle: PartitionHandle) -> Result<(), PartitionError> {
        self.partitions
            .remove(&handle)
            .map(|_| ())
            .ok_or(PartitionError::UnknownPartition { handle })
    }

    pub fn is_live(&self, handle: PartitionHandle) -> bool {
        self.partitions.contains_key(&handle)
    }

    pub fn worker_of(&self, handle: PartitionHandle) -> Result<Option<WorkerId>, PartitionError> {
        self.partitions
            .get(&handle)
            .map(|record| record.worker)
            .ok_or(PartitionError::UnknownPartition { handle })
    }

    pub fn live_handles(&self) -> impl Iterator<Item = PartitionHandle> + '_ {
        self.partitions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}
