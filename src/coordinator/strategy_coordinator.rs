use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::{
    coordinator::{
        config::CoordinatorConfig, connection::WorkerConnection, error::CoordinatorError,
    },
    partition::manager::PartitionManager,
    storage::{
        collection::StorageCollection,
        components::{component_ids, AuthorityDelegation, AuthorityIntent, SetMember},
        data_storage::MirroredComponent,
        error::StorageError,
        inbound::{ComponentUpdate, InboundChange},
    },
    strategy::{snapshot::StrategySnapshot, LoadBalancingStrategy},
    types::{EntityId, PartitionHandle},
    wire::{reader::WireReader, writer::WireWriter, Wire},
};

/// The per-tick orchestrator of authority migration.
///
/// Each tick the surrounding runtime calls [`advance`](Self::advance) then
/// [`flush`](Self::flush), with no reentrancy: inbound updates are mirrored,
/// the installed strategy decides desired assignments, and staged decisions
/// become authority-intent writes. An entity's migration is in flight from
/// the flush that writes its intent until an inbound delegation update is
/// observed to match it.
pub struct StrategyCoordinator {
    config: CoordinatorConfig,
    partitions: PartitionManager,
    strategy: Box<dyn LoadBalancingStrategy>,

    // Mirrored component state, rebuilt from inbound updates each tick.
    storages: StorageCollection,
    intent_view: HashMap<EntityId, PartitionHandle>,
    delegation_view: HashMap<EntityId, PartitionHandle>,

    // Migration state, exclusively owned here. `migrating` carries the
    // number of advances each entity has spent in flight, for the
    // re-flush policy.
    migrating: HashMap<EntityId, u32>,
    pending: HashMap<EntityId, PartitionHandle>,
    needs_reevaluation: HashSet<EntityId>,

    // Reverse of the SetMember mirror: leader -> enrolled members. Lets an
    // intent change on a leader queue its members for re-evaluation without
    // scanning the whole mirror.
    members_of: HashMap<EntityId, HashSet<EntityId>>,

    interest_dirty: bool,
}

impl StrategyCoordinator {
    pub fn new(
        partitions: PartitionManager,
        strategy: Box<dyn LoadBalancingStrategy>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            config,
            partitions,
            strategy,
            storages: StorageCollection::new(),
            intent_view: HashMap::new(),
            delegation_view: HashMap::new(),
            migrating: HashMap::new(),
            pending: HashMap::new(),
            needs_reevaluation: HashSet::new(),
            members_of: HashMap::new(),
            interest_dirty: true,
        }
    }

    /// Ingests inbound updates, confirms finished migrations, and stages
    /// new decisions from the strategy into the pending set.
    pub fn advance(
        &mut self,
        connection: &mut dyn WorkerConnection,
    ) -> Result<(), CoordinatorError> {
        // Mirror the whole batch even when an update is malformed: a bad
        // payload must not discard the well-formed updates behind it. The
        // first error is surfaced to the caller after the batch.
        let mut first_error: Option<CoordinatorError> = None;
        for change in connection.drain_changes() {
            if let Err(error) = self.mirror_change(&change) {
                warn!(
                    "Failed to mirror inbound update for component {} on entity {}: {}",
                    change.component_id(),
                    change.entity(),
                    error
                );
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }

        self.confirm_finished_migrations();
        self.restage_stuck_migrations();

        let mut to_consider = self.storages.modified_entities();
        to_consider.extend(self.needs_reevaluation.drain());

        if !to_consider.is_empty() {
            let snapshot = StrategySnapshot {
                entities: &to_consider,
                owning_workers: &self.storages.owning_worker,
                set_members: &self.storages.set_member,
                intents: &self.intent_view,
            };
            let assignments = self.strategy.compute_assignments(&snapshot);

            for (entity, target) in assignments {
                if self.migrating.contains_key(&entity) {
                    // no duplicate handoffs, even toward a different target
                    debug!(
                        "Entity {} is already migrating, skipping proposed target {:?}",
                        entity, target
                    );
                    continue;
                }
                if self.intent_view.get(&entity) == Some(&target) {
                    continue;
                }
                if let Some(previous) = self.pending.insert(entity, target) {
                    if previous != target {
                        info!(
                            "Unflushed decision for entity {} overwritten: {:?} -> {:?}",
                            entity, previous, target
                        );
                    }
                }
            }
        }

        self.storages.clear_modified();
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Writes every staged decision as an authority-intent update and marks
    /// the affected entities as migrating. Clears the pending set.
    pub fn flush(&mut self, connection: &mut dyn WorkerConnection) {
        if !self.pending.is_empty() {
            let mut staged: Vec<(EntityId, PartitionHandle)> = self.pending.drain().collect();
            staged.sort_unstable_by_key(|(entity, _)| *entity);

            for (entity, target) in staged {
                if !self.partitions.is_live(target) {
                    warn!(
                        "Strategy assigned entity {} to unresolvable partition {:?}, dropping for this tick",
                        entity, target
                    );
                    self.needs_reevaluation.insert(entity);
                    continue;
                }

                let mut writer = WireWriter::new();
                AuthorityIntent { partition: target }.ser(&mut writer);
                connection.send_update(ComponentUpdate {
                    entity,
                    component_id: component_ids::AUTHORITY_INTENT,
                    payload: writer.to_bytes(),
                });

                self.intent_view.insert(entity, target);
                self.migrating.insert(entity, 0);
                // the moved entity may itself be a set leader
                self.mark_members_for_reevaluation(entity);
            }
        }

        if self.interest_dirty {
            self.write_interest(connection);
            self.interest_dirty = false;
        }
    }

    /// Releases every owned partition and clears all mirrored and migration
    /// state. Used at shutdown; idempotent.
    pub fn destroy(
        &mut self,
        connection: &mut dyn WorkerConnection,
    ) -> Result<(), CoordinatorError> {
        let handles: Vec<PartitionHandle> = self.partitions.live_handles().collect();
        for handle in handles {
            self.partitions.destroy(handle)?;
        }

        self.storages.clear();
        self.intent_view.clear();
        self.delegation_view.clear();
        self.migrating.clear();
        self.pending.clear();
        self.needs_reevaluation.clear();
        self.members_of.clear();
        self.interest_dirty = false;

        self.write_interest(connection);
        Ok(())
    }

    /// Allocates a partition through the manager and marks the worker's
    /// interest as needing a refresh on the next flush.
    pub fn allocate_partition(&mut self) -> Result<PartitionHandle, CoordinatorError> {
        let handle = self.partitions.allocate()?;
        self.interest_dirty = true;
        Ok(handle)
    }

    pub fn destroy_partition(&mut self, handle: PartitionHandle) -> Result<(), CoordinatorError> {
        self.partitions.destroy(handle)?;
        self.interest_dirty = true;
        Ok(())
    }

    pub fn partitions(&self) -> &PartitionManager {
        &self.partitions
    }

    pub fn is_migrating(&self, entity: EntityId) -> bool {
        self.migrating.contains_key(&entity)
    }

    pub fn migrating_count(&self) -> usize {
        self.migrating.len()
    }

    pub fn pending_target(&self, entity: EntityId) -> Option<PartitionHandle> {
        self.pending.get(&entity).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn intent_of(&self, entity: EntityId) -> Option<PartitionHandle> {
        self.intent_view.get(&entity).copied()
    }

    pub fn delegation_of(&self, entity: EntityId) -> Option<PartitionHandle> {
        self.delegation_view.get(&entity).copied()
    }

    fn mirror_change(&mut self, change: &InboundChange) -> Result<(), CoordinatorError> {
        match change.component_id() {
            component_ids::AUTHORITY_DELEGATION => match change {
                InboundChange::Added(update) | InboundChange::Updated(update) => {
                    let delegation: AuthorityDelegation = decode(update)?;
                    self.delegation_view.insert(update.entity, delegation.partition);
                }
                InboundChange::Removed { entity, .. } => {
                    self.delegation_view.remove(entity);
                }
            },
            component_ids::AUTHORITY_INTENT => match change {
                InboundChange::Added(update) | InboundChange::Updated(update) => {
                    let intent: AuthorityIntent = decode(update)?;
                    self.intent_view.insert(update.entity, intent.partition);
                    self.mark_members_for_reevaluation(update.entity);
                }
                InboundChange::Removed { entity, .. } => {
                    self.intent_view.remove(entity);
                    self.mark_members_for_reevaluation(*entity);
                }
            },
            component_ids::SET_MEMBER => {
                // keep the leader -> members index in step with the mirror
                match change {
                    InboundChange::Added(update) | InboundChange::Updated(update) => {
                        let membership: SetMember = decode(update)?;
                        self.unindex_member(update.entity);
                        self.members_of
                            .entry(membership.leader)
                            .or_default()
                            .insert(update.entity);
                    }
                    InboundChange::Removed { entity, .. } => {
                        self.unindex_member(*entity);
                    }
                }
                self.storages.apply(change)?;
            }
            _ => {
                self.storages.apply(change)?;
            }
        }
        Ok(())
    }

    /// Entities whose observed delegation now matches their intended
    /// partition leave the migrating set.
    fn confirm_finished_migrations(&mut self) {
        let confirmed: Vec<EntityId> = self
            .migrating
            .keys()
            .filter(|entity| {
                let delegation = self.delegation_view.get(entity);
                delegation.is_some() && delegation == self.intent_view.get(entity)
            })
            .copied()
            .collect();

        for entity in confirmed {
            self.migrating.remove(&entity);
            // a decision skipped while the entity was in flight gets a
            // fresh look now that the handoff is done
            self.needs_reevaluation.insert(entity);
            debug!("Migration of entity {} confirmed", entity);
        }
    }

    /// Queues every enrolled member of `leader` for re-evaluation, so a
    /// leader's intent change propagates to its set on the next advance.
    fn mark_members_for_reevaluation(&mut self, leader: EntityId) {
        if let Some(members) = self.members_of.get(&leader) {
            self.needs_reevaluation.extend(members.iter().copied());
        }
    }

    /// Drops `entity` from its current leader's entry in the reverse index,
    /// using the not-yet-overwritten mirror to find that leader.
    fn unindex_member(&mut self, entity: EntityId) {
        let Some(membership) = self.storages.set_member.get(&entity).copied() else {
            return;
        };
        if let Some(members) = self.members_of.get_mut(&membership.leader) {
            members.remove(&entity);
            if members.is_empty() {
                self.members_of.remove(&membership.leader);
            }
        }
    }

    /// Applies the configured stuck-migration policy: intents unconfirmed
    /// for too many ticks are staged to be written again.
    fn restage_stuck_migrations(&mut self) {
        let Some(limit) = self.config.reflush_after_ticks else {
            for age in self.migrating.values_mut() {
                *age = age.saturating_add(1);
            }
            return;
        };

        let mut stuck: Vec<EntityId> = Vec::new();
        for (entity, age) in self.migrating.iter_mut() {
            *age = age.saturating_add(1);
            if *age >= limit {
                stuck.push(*entity);
            }
        }

        for entity in stuck {
            let Some(target) = self.intent_view.get(&entity).copied() else {
                continue;
            };
            info!(
                "Migration of entity {} unconfirmed after {} ticks, re-flushing intent {:?}",
                entity, limit, target
            );
            self.pending.insert(entity, target);
            self.migrating.insert(entity, 0);
        }
    }

    /// One interest update describing the watched component kinds and the
    /// live partitions, written on the coordinator's worker entity. Gated
    /// by the dirty flag so an unchanged tick writes nothing.
    fn write_interest(&mut self, connection: &mut dyn WorkerConnection) {
        let mut writer = WireWriter::new();

        let watched = self.storages.watched_ids();
        writer.write_u32(watched.len() as u32);
        for component_id in watched {
            writer.write_u32(component_id);
        }

        let mut handles: Vec<PartitionHandle> = self.partitions.live_handles().collect();
        handles.sort_unstable();
        writer.write_u32(handles.len() as u32);
        for handle in handles {
            writer.write_u64(handle.raw());
        }

        connection.send_update(ComponentUpdate {
            entity: self.config.worker_entity,
            component_id: component_ids::STRATEGY_INTEREST,
            payload: writer.to_bytes(),
        });
    }
}

fn decode<T: MirroredComponent>(update: &ComponentUpdate) -> Result<T, StorageError> {
    let mut reader = WireReader::new(&update.payload);
    T::de(&mut reader).map_err(|source| StorageError::Malformed {
        component_id: T::COMPONENT_ID,
        source,
    })
}
