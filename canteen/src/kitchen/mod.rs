//! Kitchen: plates delivered by the supplier and picked up by cooks.
//!
//! Guarantees:
//! - Every counter below is read and written under the Kitchen mutex.
//! - `total_produced` and `total_claimed` never exceed the production target.
//! - A type gate carries one unit per delivered-but-untaken plate of that
//!   type, so a cook that passes it always finds the plate in the tray.
//!
//! Gates:
//! - `soup_ready` / `main_ready` / `dessert_ready`: one unit per delivery.
//! - `plate_produced`: one unit per delivery, any type.
//! - `free_slots`: Kitchen capacity; the supplier takes one per delivery and
//!   cooks give it back once the plate has left for the Counter.

use parking_lot::{Mutex, MutexGuard};

use crate::plate::{PlateType, Tray};
use crate::sync::Gate;

/// Snapshot of the Kitchen counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KitchenState {
    pub tray: Tray,
    pub total_produced: u64,
    pub total_claimed: u64,
}

/// Outcome of a cook asking for the next production slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotClaim {
    Assigned {
        slot: u64,
        plate: PlateType,
        before: KitchenState,
    },
    /// Every slot up to the target has been claimed; the cook retires.
    Exhausted,
}

pub struct Kitchen {
    state: Mutex<KitchenState>,
    target: u64,

    soup_ready: Gate,
    main_ready: Gate,
    dessert_ready: Gate,
    plate_produced: Gate,
    free_slots: Gate,
}

impl Kitchen {
    pub fn new(target: u64, capacity: usize) -> Self {
        Self {
            state: Mutex::new(KitchenState::default()),
            target,
            soup_ready: Gate::new("soup_ready", 0),
            main_ready: Gate::new("main_ready", 0),
            dessert_ready: Gate::new("dessert_ready", 0),
            plate_produced: Gate::new("plate_produced", 0),
            free_slots: Gate::new("free_slots", capacity),
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn snapshot(&self) -> KitchenState {
        *self.state.lock()
    }

    /// Locks the Kitchen for a multi-step critical section.
    pub fn lock(&self) -> MutexGuard<'_, KitchenState> {
        self.state.lock()
    }

    pub fn is_stocked(&self) -> bool {
        self.state.lock().total_produced >= self.target
    }

    /// Stores one plate and opens its type gate. Returns the state after delivery.
    ///
    /// The caller signals `plate_produced` once this returns.
    pub fn deliver(&self, plate: PlateType) -> KitchenState {
        let mut state = self.state.lock();
        state.tray.add(plate);
        state.total_produced += 1;
        self.ready_gate(plate).signal();
        *state
    }

    /// Claims the next production slot, or reports that none remain.
    ///
    /// The `k`-th successful claim is assigned `PlateType::for_slot(k)`, so
    /// types rotate soup, main, dessert regardless of what the tray holds.
    pub fn claim_slot(&self) -> SlotClaim {
        let mut state = self.state.lock();
        let before = *state;

        state.total_claimed += 1;
        if state.total_claimed > self.target {
            state.total_claimed -= 1;
            return SlotClaim::Exhausted;
        }

        SlotClaim::Assigned {
            slot: state.total_claimed,
            plate: PlateType::for_slot(state.total_claimed),
            before,
        }
    }

    pub fn ready_gate(&self, plate: PlateType) -> &Gate {
        match plate {
            PlateType::Soup => &self.soup_ready,
            PlateType::Main => &self.main_ready,
            PlateType::Dessert => &self.dessert_ready,
        }
    }

    pub fn plate_produced(&self) -> &Gate {
        &self.plate_produced
    }

    pub fn free_slots(&self) -> &Gate {
        &self.free_slots
    }
}
