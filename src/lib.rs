//! # Authority Core
//! Authority-migration and RPC delivery core for a partitioned simulation
//! runtime: decides which worker should own which entity, orchestrates the
//! asynchronous handoff of that ownership, and moves reliable/unreliable
//! remote calls between an entity's owning replica and its proxies.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod coordinator;
mod partition;
mod rpc;
mod storage;
mod strategy;
mod types;
mod wire;

pub use coordinator::{
    config::CoordinatorConfig,
    connection::WorkerConnection,
    error::CoordinatorError,
    strategy_coordinator::StrategyCoordinator,
};
pub use partition::{
    error::PartitionError,
    id_pool::{CounterIdPool, IdPool},
    manager::PartitionManager,
};
pub use rpc::{
    ack::Ack,
    endpoint::Endpoint,
    error::RpcError,
    ring_buffer::{RingBuffer, RingBufferConfig},
};
pub use storage::{
    collection::StorageCollection,
    components::{
        component_ids, AuthorityDelegation, AuthorityIntent, OwningWorker, SetMember,
    },
    data_storage::{DataStorage, MirroredComponent},
    error::StorageError,
    inbound::{ComponentUpdate, InboundChange},
};
pub use strategy::{
    round_robin::RoundRobinStrategy,
    set_affinity::SetAffinityStrategy,
    single_worker::SingleWorkerStrategy,
    snapshot::StrategySnapshot,
    LoadBalancingStrategy,
};
pub use types::{
    ComponentId, EntityId, PartitionHandle, Reliability, SequenceNumber, WorkerId,
};
pub use wire::{error::WireError, reader::WireReader, writer::WireWriter, Wire};
