use crate::{
    strategy::{snapshot::StrategySnapshot, LoadBalancingStrategy},
    types::{EntityId, PartitionHandle},
};

/// Keeps grouped entities together: a set member follows the current
/// authority intent of its set leader. Entities without a membership
/// marker, or whose leader has no intent yet, are left alone this tick.
pub struct SetAffinityStrategy;

impl SetAffinityStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SetAffinityStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadBalancingStrategy for SetAffinityStrategy {
    fn compute_assignments(
        &self,
        snapshot: &StrategySnapshot,
    ) -> Vec<(EntityId, PartitionHandle)> {
        let mut assignments = Vec::new();

        for entity in snapshot.entities_ordered() {
            let Some(membership) = snapshot.set_members.get(&entity) else {
                continue;
            };
            // a leader follows itself; nothing to do
            if membership.leader == entity {
                continue;
            }
            if let Some(partition) = snapshot.intents.get(&membership.leader) {
                assignments.push((entity, *partition));
            }
        }

        assignments
    }
}
