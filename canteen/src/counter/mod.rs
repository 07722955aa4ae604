//! Counter: plates staged by cooks for students, the meal-ready gate and
//! the table pool.
//!
//! With `ReadyRule::Outstanding` and `ClaimMode::Locked` the Counter keeps
//! `outstanding_meals <= min(soup, main, dessert)`, so a student that
//! passes the meal-ready gate always finds a complete meal.

pub mod table;

use parking_lot::{Mutex, MutexGuard};

use crate::config::{ClaimMode, ReadyRule};
use crate::plate::{PlateType, Tray};
use crate::sync::Gate;

pub use table::{Seat, TablePool};

/// Snapshot of the Counter counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterState {
    pub tray: Tray,

    /// Students between joining the queue and taking their meal. Diagnostic only.
    pub waiting_students: usize,

    /// Meal-ready units signalled that no student has claimed yet.
    pub outstanding_meals: u64,

    pub meals_served: u64,
}

pub struct Counter {
    state: Mutex<CounterState>,
    meal_ready: Gate,
    tables: TablePool,
    threshold: usize,
}

impl Counter {
    pub fn new(tables: usize, threshold: usize) -> Self {
        Self {
            state: Mutex::new(CounterState::default()),
            meal_ready: Gate::new("meal_ready", 0),
            tables: TablePool::new(tables),
            threshold,
        }
    }

    pub fn snapshot(&self) -> CounterState {
        *self.state.lock()
    }

    /// Locks the Counter for a multi-step critical section.
    pub fn lock(&self) -> MutexGuard<'_, CounterState> {
        self.state.lock()
    }

    pub fn meal_ready(&self) -> &Gate {
        &self.meal_ready
    }

    pub fn tables(&self) -> &TablePool {
        &self.tables
    }

    /// True when the counter holds more plates than the configured threshold.
    pub fn is_crowded(&self, state: &CounterState) -> bool {
        state.tray.total() > self.threshold as i64
    }

    /// Puts one plate on the counter. Returns the state after placement.
    pub fn place(&self, plate: PlateType) -> CounterState {
        let mut state = self.state.lock();
        state.tray.add(plate);
        *state
    }

    /// Opens the meal-ready gate once if `rule` says another meal is available.
    ///
    /// Returns whether a unit was signalled.
    pub fn signal_if_meal_ready(&self, rule: ReadyRule) -> bool {
        let mut state = self.state.lock();
        if !state.tray.has_meal() {
            return false;
        }

        let signalled = match rule {
            ReadyRule::Outstanding => (state.outstanding_meals as i64) < rule.ceiling(&state.tray),
            ReadyRule::Literal => (self.meal_ready.available() as i64) < rule.ceiling(&state.tray),
        };

        if signalled {
            state.outstanding_meals += 1;
            self.meal_ready.signal();
        }
        signalled
    }

    /// Registers a student in the queue. Returns the state after joining.
    pub fn join_queue(&self) -> CounterState {
        let mut state = self.state.lock();
        state.waiting_students += 1;
        *state
    }

    /// Takes one plate of each type for a student who passed the meal-ready
    /// gate and removes them from the queue. Returns the state afterwards.
    pub fn claim_meal(&self, mode: ClaimMode) -> CounterState {
        match mode {
            ClaimMode::Locked => {
                let mut state = self.state.lock();
                for plate in PlateType::ALL {
                    state.tray.remove(plate);
                }
                Self::leave_queue(&mut state);
                *state
            }
            ClaimMode::Unlocked => {
                for plate in PlateType::ALL {
                    self.take_course(plate);
                }
                self.finish_claim()
            }
        }
    }

    /// Removes one plate in its own critical section. Peers can run between
    /// two calls and see a half-claimed meal.
    pub fn take_course(&self, plate: PlateType) -> CounterState {
        let mut state = self.state.lock();
        state.tray.remove(plate);
        *state
    }

    /// Queue bookkeeping that closes a claim made course by course.
    pub fn finish_claim(&self) -> CounterState {
        let mut state = self.state.lock();
        Self::leave_queue(&mut state);
        *state
    }

    fn leave_queue(state: &mut CounterState) {
        state.waiting_students = state.waiting_students.saturating_sub(1);
        state.outstanding_meals = state.outstanding_meals.saturating_sub(1);
        state.meals_served += 1;
    }
}
