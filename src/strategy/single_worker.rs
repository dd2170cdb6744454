use crate::{
    strategy::{snapshot::StrategySnapshot, LoadBalancingStrategy},
    types::{EntityId, PartitionHandle},
};

/// Assigns every considered entity to one fixed partition. The degenerate
/// strategy for single-worker deployments and tests.
pub struct SingleWorkerStrategy {
    partition: PartitionHandle,
}

impl SingleWorkerStrategy {
    pub fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }
}

impl LoadBalancingStrategy for SingleWorkerStrategy {
    fn compute_assignments(
        &self,
        snapshot: &StrategySnapshot,
    ) -> Vec<(EntityId, PartitionHandle)> {
        snapshot
            .entities_ordered()
            .into_iter()
            .map(|entity| (entity, self.partition))
            .collect()
    }
}
