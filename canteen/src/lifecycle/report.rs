use common::logger::RunId;

use crate::cook::CookSummary;
use crate::counter::CounterState;
use crate::kitchen::KitchenState;
use crate::metrics::CountersSnapshot;
use crate::student::StudentSummary;
use crate::supplier::SupplierSummary;

/// What one actor reported when it finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorSummary {
    Supplier(SupplierSummary),
    Cook(CookSummary),
    Student(StudentSummary),
}

/// Outcome of a run in which every actor completed its protocol.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub kitchen: KitchenState,
    pub counter: CounterState,
    pub counters: CountersSnapshot,
    pub peak_seated: usize,

    pub supplier: Option<SupplierSummary>,
    /// Sorted by cook id.
    pub cooks: Vec<CookSummary>,
    /// Sorted by student id.
    pub students: Vec<StudentSummary>,
}

impl RunReport {
    pub(crate) fn new(
        run_id: RunId,
        kitchen: KitchenState,
        counter: CounterState,
        counters: CountersSnapshot,
        peak_seated: usize,
        summaries: Vec<ActorSummary>,
    ) -> Self {
        let mut supplier = None;
        let mut cooks = Vec::new();
        let mut students = Vec::new();

        for s in summaries {
            match s {
                ActorSummary::Supplier(v) => supplier = Some(v),
                ActorSummary::Cook(v) => cooks.push(v),
                ActorSummary::Student(v) => students.push(v),
            }
        }
        cooks.sort_by_key(|c| c.id);
        students.sort_by_key(|s| s.id);

        Self {
            run_id,
            kitchen,
            counter,
            counters,
            peak_seated,
            supplier,
            cooks,
            students,
        }
    }

    /// Plates moved by all cooks together.
    pub fn plates_served(&self) -> u64 {
        self.cooks.iter().map(|c| c.plates_served).sum()
    }

    /// Both regions hold no plates.
    pub fn is_drained(&self) -> bool {
        self.kitchen.tray.is_empty() && self.counter.tray.is_empty()
    }
}
