use crate::{
    strategy::{snapshot::StrategySnapshot, LoadBalancingStrategy},
    types::{EntityId, PartitionHandle},
};

/// Spreads entities across a fixed list of partitions by entity id modulo
/// the list length. Stateless, so repeated evaluation of the same entity
/// always lands on the same partition (no churn).
pub struct RoundRobinStrategy {
    partitions: Vec<PartitionHandle>,
}

impl RoundRobinStrategy {
    pub fn new(partitions: Vec<PartitionHandle>) -> Self {
        Self { partitions }
    }
}

impl LoadBalancingStrategy for RoundRobinStrategy {
    fn compute_assignments(
        &self,
        snapshot: &StrategySnapshot,
    ) -> Vec<(EntityId, PartitionHandle)> {
        if self.partitions.is_empty() {
            return Vec::new();
        }

        snapshot
            .entities_ordered()
            .into_iter()
            .map(|entity| {
                let index = (entity % self.partitions.len() as u64) as usize;
                (entity, self.partitions[index])
            })
            .collect()
    }
}
