use crate::{
    storage::data_storage::MirroredComponent,
    types::{ComponentId, EntityId, PartitionHandle, WorkerId},
    wire::{error::WireError, reader::WireReader, writer::WireWriter, Wire},
};

/// Numeric component identifiers, fixed by the schema contract of the
/// surrounding runtime (produced by build-time code generation, consumed
/// here as constants).
pub mod component_ids {
    use crate::types::ComponentId;

    pub const OWNING_WORKER: ComponentId = 9001;
    pub const SET_MEMBER: ComponentId = 9002;
    pub const AUTHORITY_INTENT: ComponentId = 9003;
    pub const AUTHORITY_DELEGATION: ComponentId = 9004;
    pub const STRATEGY_INTEREST: ComponentId = 9005;
}

/// Ownership marker: the worker a client-owned entity is pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwningWorker {
    pub worker: WorkerId,
}

impl Wire for OwningWorker {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u32(self.worker);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        Ok(Self {
            worker: reader.read_u32()?,
        })
    }
}

impl MirroredComponent for OwningWorker {
    const COMPONENT_ID: ComponentId = component_ids::OWNING_WORKER;
}

/// Grouping membership: this entity migrates with its set leader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetMember {
    pub leader: EntityId,
}

impl Wire for SetMember {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u64(self.leader);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        Ok(Self {
            leader: reader.read_u64()?,
        })
    }
}

impl MirroredComponent for SetMember {
    const COMPONENT_ID: ComponentId = component_ids::SET_MEMBER;
}

/// Desired partition for an entity, as decided by the strategy.
/// Written by the coordinator, confirmed by an observed delegation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorityIntent {
    pub partition: PartitionHandle,
}

impl Wire for AuthorityIntent {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u64(self.partition.raw());
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        Ok(Self {
            partition: PartitionHandle::from_raw(reader.read_u64()?),
        })
    }
}

impl MirroredComponent for AuthorityIntent {
    const COMPONENT_ID: ComponentId = component_ids::AUTHORITY_INTENT;
}

/// Authority actually in effect, as observed from the network. Lags the
/// intent while a migration is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthorityDelegation {
    pub partition: PartitionHandle,
}

impl Wire for AuthorityDelegation {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u64(self.partition.raw());
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        Ok(Self {
            partition: PartitionHandle::from_raw(reader.read_u64()?),
        })
    }
}

impl MirroredComponent for AuthorityDelegation {
    const COMPONENT_ID: ComponentId = component_ids::AUTHORITY_DELEGATION;
}
