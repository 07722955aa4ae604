use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Event counters for one run. Observability only; no actor reads them to
/// make decisions.
#[derive(Clone, Default)]
pub struct RunCounters {
    pub plates_produced: Arc<AtomicU64>,
    pub slots_claimed: Arc<AtomicU64>,
    pub plates_transferred: Arc<AtomicU64>,

    pub meal_signals: Arc<AtomicU64>,
    pub meals_claimed: Arc<AtomicU64>,
    pub seatings: Arc<AtomicU64>,

    // diagnostics
    pub threshold_warnings: Arc<AtomicU64>,
    pub negative_observations: Arc<AtomicU64>,
}

impl RunCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        let load = |c: &Arc<AtomicU64>| c.load(Ordering::Relaxed);
        CountersSnapshot {
            plates_produced: load(&self.plates_produced),
            slots_claimed: load(&self.slots_claimed),
            plates_transferred: load(&self.plates_transferred),
            meal_signals: load(&self.meal_signals),
            meals_claimed: load(&self.meals_claimed),
            seatings: load(&self.seatings),
            threshold_warnings: load(&self.threshold_warnings),
            negative_observations: load(&self.negative_observations),
        }
    }
}

/// Plain copy of [`RunCounters`] taken at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub plates_produced: u64,
    pub slots_claimed: u64,
    pub plates_transferred: u64,
    pub meal_signals: u64,
    pub meals_claimed: u64,
    pub seatings: u64,
    pub threshold_warnings: u64,
    pub negative_observations: u64,
}
