use crate::types::{ComponentId, EntityId};

/// A serialized component value for one entity, as carried by the
/// surrounding runtime's connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentUpdate {
    pub entity: EntityId,
    pub component_id: ComponentId,
    pub payload: Vec<u8>,
}

/// One freshly arrived change for a watched component kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundChange {
    Added(ComponentUpdate),
    Updated(ComponentUpdate),
    Removed {
        entity: EntityId,
        component_id: ComponentId,
    },
}

impl InboundChange {
    pub fn entity(&self) -> EntityId {
        match self {
            InboundChange::Added(update) | InboundChange::Updated(update) => update.entity,
            InboundChange::Removed { entity, .. } => *entity,
        }
    }

    pub fn component_id(&self) -> ComponentId {
        match self {
            InboundChange::Added(update) | InboundChange::Updated(update) => update.component_id,
            InboundChange::Removed { component_id, .. } => *component_id,
        }
    }
}
