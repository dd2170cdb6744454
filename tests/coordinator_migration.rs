/// Tests for the strategy coordinator's migration state machine: staging,
/// flushing, confirmation, last-decision-wins, and the no-duplicate-handoff
/// guarantee.
use std::{cell::Cell, mem, rc::Rc};

use authority_core::{
    component_ids, AuthorityDelegation, AuthorityIntent, ComponentUpdate, CoordinatorConfig,
    CoordinatorError, CounterIdPool, EntityId, InboundChange, LoadBalancingStrategy, OwningWorker,
    PartitionHandle, PartitionManager, SetAffinityStrategy, SetMember, StrategyCoordinator,
    StrategySnapshot, Wire, WireReader, WireWriter, WorkerConnection,
};

#[derive(Default)]
struct RecordingConnection {
    inbound: Vec<InboundChange>,
    sent: Vec<ComponentUpdate>,
}

impl WorkerConnection for RecordingConnection {
    fn drain_changes(&mut self) -> Vec<InboundChange> {
        mem::take(&mut self.inbound)
    }

    fn send_update(&mut self, update: ComponentUpdate) {
        self.sent.push(update);
    }
}

impl RecordingConnection {
    fn sent_intents(&self) -> Vec<(EntityId, PartitionHandle)> {
        self.sent
            .iter()
            .filter(|update| update.component_id == component_ids::AUTHORITY_INTENT)
            .map(|update| {
                let mut reader = WireReader::new(&update.payload);
                let intent = AuthorityIntent::de(&mut reader).unwrap();
                (update.entity, intent.partition)
            })
            .collect()
    }

    fn sent_interest_count(&self) -> usize {
        self.sent
            .iter()
            .filter(|update| update.component_id == component_ids::STRATEGY_INTEREST)
            .count()
    }
}

/// Assigns every considered entity to whatever the shared cell currently
/// holds, letting a test change the policy's mind between advances.
struct SharedTargetStrategy {
    target: Rc<Cell<PartitionHandle>>,
}

impl LoadBalancingStrategy for SharedTargetStrategy {
    fn compute_assignments(
        &self,
        snapshot: &StrategySnapshot,
    ) -> Vec<(EntityId, PartitionHandle)> {
        snapshot
            .entities_ordered()
            .into_iter()
            .map(|entity| (entity, self.target.get()))
            .collect()
    }
}

fn owning_worker_change(entity: EntityId, worker: u32) -> InboundChange {
    let mut writer = WireWriter::new();
    OwningWorker { worker }.ser(&mut writer);
    InboundChange::Updated(ComponentUpdate {
        entity,
        component_id: component_ids::OWNING_WORKER,
        payload: writer.to_bytes(),
    })
}

fn set_member_change(entity: EntityId, leader: EntityId) -> InboundChange {
    let mut writer = WireWriter::new();
    SetMember { leader }.ser(&mut writer);
    InboundChange::Updated(ComponentUpdate {
        entity,
        component_id: component_ids::SET_MEMBER,
        payload: writer.to_bytes(),
    })
}

fn intent_change(entity: EntityId, partition: PartitionHandle) -> InboundChange {
    let mut writer = WireWriter::new();
    AuthorityIntent { partition }.ser(&mut writer);
    InboundChange::Updated(ComponentUpdate {
        entity,
        component_id: component_ids::AUTHORITY_INTENT,
        payload: writer.to_bytes(),
    })
}

fn delegation_change(entity: EntityId, partition: PartitionHandle) -> InboundChange {
    let mut writer = WireWriter::new();
    AuthorityDelegation { partition }.ser(&mut writer);
    InboundChange::Updated(ComponentUpdate {
        entity,
        component_id: component_ids::AUTHORITY_DELEGATION,
        payload: writer.to_bytes(),
    })
}

struct Harness {
    coordinator: StrategyCoordinator,
    connection: RecordingConnection,
    target: Rc<Cell<PartitionHandle>>,
    partition: PartitionHandle,
}

fn harness_with_config(config: CoordinatorConfig) -> Harness {
    let mut partitions = PartitionManager::new(Box::new(CounterIdPool::new(100, 200)));
    let partition = partitions.allocate().unwrap();

    let target = Rc::new(Cell::new(partition));
    let strategy = SharedTargetStrategy {
        target: Rc::clone(&target),
    };

    Harness {
        coordinator: StrategyCoordinator::new(partitions, Box::new(strategy), config),
        connection: RecordingConnection::default(),
        target,
        partition,
    }
}

fn harness() -> Harness {
    harness_with_config(CoordinatorConfig::default())
}

#[test]
fn stable_entity_migrates_and_returns_to_stable() {
    let mut h = harness();

    // a watched component change brings entity 42 up for consideration
    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_target(42), Some(h.partition));
    assert!(!h.coordinator.is_migrating(42));

    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_intents(), vec![(42, h.partition)]);
    assert_eq!(h.coordinator.intent_of(42), Some(h.partition));
    assert!(h.coordinator.is_migrating(42));
    assert_eq!(h.coordinator.pending_count(), 0);

    // the network confirms: delegation now matches the intent
    h.connection.inbound.push(delegation_change(42, h.partition));
    h.coordinator.advance(&mut h.connection).unwrap();
    assert!(!h.coordinator.is_migrating(42));
    assert_eq!(h.coordinator.delegation_of(42), Some(h.partition));
}

#[test]
fn last_decision_before_flush_wins() {
    let mut h = harness();
    let second_target = h.coordinator.allocate_partition().unwrap();

    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_target(42), Some(h.partition));

    // the strategy changes its mind before any flush
    h.target.set(second_target);
    h.connection.inbound.push(owning_worker_change(42, 2));
    h.coordinator.advance(&mut h.connection).unwrap();

    assert_eq!(h.coordinator.pending_count(), 1);
    assert_eq!(h.coordinator.pending_target(42), Some(second_target));

    // only the final decision reaches the wire
    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_intents(), vec![(42, second_target)]);
}

#[test]
fn migrating_entities_are_never_restaged() {
    let mut h = harness();
    let second_target = h.coordinator.allocate_partition().unwrap();

    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    h.coordinator.flush(&mut h.connection);
    assert!(h.coordinator.is_migrating(42));

    // a different target for an in-flight entity is ignored
    h.target.set(second_target);
    h.connection.inbound.push(owning_worker_change(42, 2));
    h.coordinator.advance(&mut h.connection).unwrap();

    assert_eq!(h.coordinator.pending_count(), 0);
    assert_eq!(h.coordinator.intent_of(42), Some(h.partition));
    assert!(h.coordinator.is_migrating(42));
}

#[test]
fn unchanged_decision_is_not_restaged() {
    let mut h = harness();

    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    h.coordinator.flush(&mut h.connection);

    h.connection.inbound.push(delegation_change(42, h.partition));
    h.coordinator.advance(&mut h.connection).unwrap();
    assert!(!h.coordinator.is_migrating(42));

    // same entity changes again, strategy proposes the same partition:
    // intent already matches, nothing new to stage
    h.connection.inbound.push(owning_worker_change(42, 2));
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_count(), 0);
}

#[test]
fn unresolvable_partition_is_dropped_then_retried() {
    let mut h = harness();
    let dead_target = PartitionHandle::from_raw(999);

    h.target.set(dead_target);
    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_target(42), Some(dead_target));

    // flush drops the assignment; nothing written, nothing migrating
    h.coordinator.flush(&mut h.connection);
    assert!(h.connection.sent_intents().is_empty());
    assert!(!h.coordinator.is_migrating(42));

    // the strategy is re-invoked for the entity on the next tick, with no
    // new inbound traffic required
    h.target.set(h.partition);
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_target(42), Some(h.partition));

    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_intents(), vec![(42, h.partition)]);
}

#[test]
fn stuck_migration_is_reflushed_when_configured() {
    let mut h = harness_with_config(CoordinatorConfig {
        reflush_after_ticks: Some(2),
        ..CoordinatorConfig::default()
    });

    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_intents().len(), 1);

    // two advances with no confirmation: the intent is staged again
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_count(), 0);
    h.coordinator.advance(&mut h.connection).unwrap();
    assert_eq!(h.coordinator.pending_target(42), Some(h.partition));

    h.coordinator.flush(&mut h.connection);
    assert_eq!(
        h.connection.sent_intents(),
        vec![(42, h.partition), (42, h.partition)]
    );
    assert!(h.coordinator.is_migrating(42));
}

#[test]
fn unconfirmed_migration_stays_in_flight_by_default() {
    let mut h = harness();

    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    h.coordinator.flush(&mut h.connection);

    for _ in 0..10 {
        h.coordinator.advance(&mut h.connection).unwrap();
        h.coordinator.flush(&mut h.connection);
    }

    assert!(h.coordinator.is_migrating(42));
    assert_eq!(h.connection.sent_intents().len(), 1);
}

#[test]
fn interest_is_written_once_until_partitions_change() {
    let mut h = harness();

    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_interest_count(), 1);

    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_interest_count(), 1);

    h.coordinator.allocate_partition().unwrap();
    h.coordinator.flush(&mut h.connection);
    assert_eq!(h.connection.sent_interest_count(), 2);
}

#[test]
fn set_member_follows_leader_intent_changes() {
    let mut partitions = PartitionManager::new(Box::new(CounterIdPool::new(100, 200)));
    let first_target = partitions.allocate().unwrap();
    let second_target = partitions.allocate().unwrap();
    let mut coordinator = StrategyCoordinator::new(
        partitions,
        Box::new(SetAffinityStrategy::new()),
        CoordinatorConfig::default(),
    );
    let mut connection = RecordingConnection::default();

    // leader 1 already intends first_target; member 2 enrolls under it
    connection.inbound.push(intent_change(1, first_target));
    connection.inbound.push(set_member_change(2, 1));
    coordinator.advance(&mut connection).unwrap();
    assert_eq!(coordinator.pending_target(2), Some(first_target));

    coordinator.flush(&mut connection);
    assert_eq!(coordinator.intent_of(2), Some(first_target));

    // handoff confirmed, member back to stable
    connection.inbound.push(delegation_change(2, first_target));
    coordinator.advance(&mut connection).unwrap();
    assert!(!coordinator.is_migrating(2));

    // the leader moves; the member follows with no change to its own
    // watched components
    connection.inbound.push(intent_change(1, second_target));
    coordinator.advance(&mut connection).unwrap();
    assert_eq!(coordinator.pending_target(2), Some(second_target));

    coordinator.flush(&mut connection);
    assert_eq!(coordinator.intent_of(2), Some(second_target));
}

#[test]
fn unenrolled_member_stops_following_its_leader() {
    let mut partitions = PartitionManager::new(Box::new(CounterIdPool::new(100, 200)));
    let first_target = partitions.allocate().unwrap();
    let second_target = partitions.allocate().unwrap();
    let mut coordinator = StrategyCoordinator::new(
        partitions,
        Box::new(SetAffinityStrategy::new()),
        CoordinatorConfig::default(),
    );
    let mut connection = RecordingConnection::default();

    connection.inbound.push(intent_change(1, first_target));
    connection.inbound.push(set_member_change(2, 1));
    coordinator.advance(&mut connection).unwrap();
    coordinator.flush(&mut connection);
    connection.inbound.push(delegation_change(2, first_target));
    coordinator.advance(&mut connection).unwrap();

    // membership removed, then the leader moves: no new decision for 2
    connection.inbound.push(InboundChange::Removed {
        entity: 2,
        component_id: component_ids::SET_MEMBER,
    });
    coordinator.advance(&mut connection).unwrap();
    connection.inbound.push(intent_change(1, second_target));
    coordinator.advance(&mut connection).unwrap();

    assert_eq!(coordinator.pending_target(2), None);
    assert_eq!(coordinator.intent_of(2), Some(first_target));
}

#[test]
fn malformed_update_does_not_discard_the_rest_of_the_batch() {
    let mut h = harness();

    // a bad payload arrives ahead of a well-formed one in the same tick
    h.connection.inbound.push(InboundChange::Updated(ComponentUpdate {
        entity: 7,
        component_id: component_ids::AUTHORITY_DELEGATION,
        payload: vec![0x01],
    }));
    h.connection.inbound.push(owning_worker_change(42, 1));

    let result = h.coordinator.advance(&mut h.connection);
    assert!(matches!(result, Err(CoordinatorError::Storage(_))));

    // the well-formed update behind it was still mirrored and staged
    assert_eq!(h.coordinator.pending_target(42), Some(h.partition));
}

#[test]
fn malformed_watched_update_is_surfaced() {
    let mut h = harness();

    h.connection.inbound.push(InboundChange::Updated(ComponentUpdate {
        entity: 42,
        component_id: component_ids::AUTHORITY_DELEGATION,
        payload: vec![0x01],
    }));

    let result = h.coordinator.advance(&mut h.connection);
    assert!(matches!(result, Err(CoordinatorError::Storage(_))));
}

#[test]
fn destroy_releases_partitions_and_clears_state() {
    let mut h = harness();

    h.connection.inbound.push(owning_worker_change(42, 1));
    h.coordinator.advance(&mut h.connection).unwrap();
    h.coordinator.flush(&mut h.connection);
    assert!(h.coordinator.is_migrating(42));

    h.coordinator.destroy(&mut h.connection).unwrap();

    assert!(h.coordinator.partitions().is_empty());
    assert_eq!(h.coordinator.migrating_count(), 0);
    assert_eq!(h.coordinator.pending_count(), 0);
    assert_eq!(h.coordinator.intent_of(42), None);

    // idempotent
    h.coordinator.destroy(&mut h.connection).unwrap();
}
