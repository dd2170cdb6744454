pub mod round_robin;
pub mod set_affinity;
pub mod single_worker;
pub mod snapshot;

use crate::types::{EntityId, PartitionHandle};
use snapshot::StrategySnapshot;

/// The pluggable assignment policy.
///
/// A pure decision function: no I/O, no mutation of the snapshot, and
/// deterministic for a given input — the coordinator may invoke it every
/// tick and relies on unchanged input producing unchanged output to avoid
/// migration churn. Concrete strategies are selected at construction time.
pub trait LoadBalancingStrategy {
    fn compute_assignments(
        &self,
        snapshot: &StrategySnapshot,
    ) -> Vec<(EntityId, PartitionHandle)>;
}
