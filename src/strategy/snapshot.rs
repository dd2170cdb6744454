use std::collections::{HashMap, HashSet};

use crate::{
    storage::{
        components::{OwningWorker, SetMember},
        data_storage::DataStorage,
    },
    types::{EntityId, PartitionHandle},
};

/// Read-only view of the mirrored state a strategy decides over, scoped to
/// the entities the coordinator wants re-evaluated this tick.
pub struct StrategySnapshot<'a> {
    /// Entities whose watched components changed or which require
    /// re-evaluation.
    pub entities: &'a HashSet<EntityId>,
    pub owning_workers: &'a DataStorage<OwningWorker>,
    pub set_members: &'a DataStorage<SetMember>,
    /// Current authority intents, including in-flight migrations.
    pub intents: &'a HashMap<EntityId, PartitionHandle>,
}

impl<'a> StrategySnapshot<'a> {
    /// Entities to consider, in a stable order. Strategies iterate this so
    /// their output order does not depend on hash-set iteration.
    pub fn entities_ordered(&self) -> Vec<EntityId> {
        let mut entities: Vec<EntityId> = self.entities.iter().copied().collect();
        entities.sort_unstable();
        entities
    }
}
