use std::collections::HashSet;

use crate::{
    storage::{
        components::{OwningWorker, SetMember},
        data_storage::{DataStorage, MirroredComponent},
        error::StorageError,
        inbound::InboundChange,
    },
    types::{ComponentId, EntityId},
};

/// The set of component mirrors the strategy reads. One named storage per
/// watched kind; unwatched component ids pass through untouched.
#[derive(Debug, Default)]
pub struct StorageCollection {
    pub owning_worker: DataStorage<OwningWorker>,
    pub set_member: DataStorage<SetMember>,
}

impl StorageCollection {
    pub fn new() -> Self {
        Self {
            owning_worker: DataStorage::new(),
            set_member: DataStorage::new(),
        }
    }

    pub fn watched_ids(&self) -> [ComponentId; 2] {
        [OwningWorker::COMPONENT_ID, SetMember::COMPONENT_ID]
    }

    /// Routes one inbound change to the storage watching its component id.
    /// Returns whether the change was consumed.
    pub fn apply(&mut self, change: &InboundChange) -> Result<bool, StorageError> {
        match change.component_id() {
            OwningWorker::COMPONENT_ID => {
                self.owning_worker.apply(change)?;
                Ok(true)
            }
            SetMember::COMPONENT_ID => {
                self.set_member.apply(change)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Union of entities touched since the last `clear_modified` across all
    /// watched kinds.
    pub fn modified_entities(&self) -> HashSet<EntityId> {
        let mut entities: HashSet<EntityId> = HashSet::new();
        entities.extend(self.owning_worker.modified());
        entities.extend(self.set_member.modified());
        entities
    }

    pub fn clear_modified(&mut self) {
        self.owning_worker.clear_modified();
        self.set_member.clear_modified();
    }

    pub fn clear(&mut self) {
        self.owning_worker.clear();
        self.set_member.clear();
    }
}
