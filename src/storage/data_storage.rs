use std::collections::{HashMap, HashSet};

use crate::{
    storage::{
        error::StorageError,
        inbound::{ComponentUpdate, InboundChange},
    },
    types::{ComponentId, EntityId},
    wire::{reader::WireReader, Wire},
};

/// A replicated component kind the coordinator mirrors locally.
pub trait MirroredComponent: Wire {
    const COMPONENT_ID: ComponentId;
}

/// Typed, per-entity cache of one mirrored component kind, rebuilt from
/// inbound updates each tick. Tracks which entities changed since the last
/// `clear_modified` so the coordinator can scope strategy re-evaluation.
#[derive(Debug)]
pub struct DataStorage<T: MirroredComponent> {
    entries: HashMap<EntityId, T>,
    modified: HashSet<EntityId>,
}

impl<T: MirroredComponent> DataStorage<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            modified: HashSet::new(),
        }
    }

    pub fn get(&self, entity: &EntityId) -> Option<&T> {
        self.entries.get(entity)
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        self.entries.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn modified(&self) -> &HashSet<EntityId> {
        &self.modified
    }

    pub fn clear_modified(&mut self) {
        self.modified.clear();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.modified.clear();
    }

    /// Applies one inbound change for this component kind. A payload that
    /// fails to decode leaves the mirror untouched and surfaces the error.
    pub fn apply(&mut self, change: &InboundChange) -> Result<(), StorageError> {
        match change {
            InboundChange::Added(update) | InboundChange::Updated(update) => {
                let value = self.decode(update)?;
                self.entries.insert(update.entity, value);
                self.modified.insert(update.entity);
            }
            InboundChange::Removed { entity, .. } => {
                self.entries.remove(entity);
                self.modified.insert(*entity);
            }
        }
        Ok(())
    }

    fn decode(&self, update: &ComponentUpdate) -> Result<T, StorageError> {
        let mut reader = WireReader::new(&update.payload);
        T::de(&mut reader).map_err(|source| StorageError::Malformed {
            component_id: T::COMPONENT_ID,
            source,
        })
    }
}

impl<T: MirroredComponent> Default for DataStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
