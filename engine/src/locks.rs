//! Per-entity exclusive locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use agora_store::EntityKind;

/// Serializes operations on the same entity while letting operations on
/// different entities run in parallel.
///
/// Lock slots are created on first use and kept for the life of the engine.
/// The dispatcher only asks for slots of records that exist, so the map holds
/// at most one slot per stored proposal or loan.
#[derive(Default)]
pub struct EntityLocks {
    slots: Mutex<HashMap<(EntityKind, u64), Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock slot for one entity.
    pub fn slot(&self, kind: EntityKind, id: u64) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.entry((kind, id)).or_default().clone()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hold a slot. The guarded value is `()`, so a poisoned slot carries no
/// torn state and is taken over.
pub fn hold(slot: &Mutex<()>) -> MutexGuard<'_, ()> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
