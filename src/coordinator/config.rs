use crate::types::EntityId;

/// Tuning knobs for the strategy coordinator, set once at construction.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Entity the coordinator writes its interest component on; the worker
    /// entity of this coordinator in the surrounding runtime.
    pub worker_entity: EntityId,

    /// Migrations with no observed confirmation after this many `advance`
    /// calls have their authority intent staged and written again.
    ///
    /// `None` disables the retry: an entity whose target worker never
    /// confirms stays in flight indefinitely.
    pub reflush_after_ticks: Option<u32>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            worker_entity: 0,
            reflush_after_ticks: None,
        }
    }
}
