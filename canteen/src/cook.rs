//! Cook: moves plates from the Kitchen to the Counter.
//!
//! Each iteration:
//! 1) claim a production slot (the slot number fixes the plate type),
//! 2) wait for that type's gate, then for `plate_produced`,
//! 3) Kitchen lock, then Counter lock: take the plate out of the Kitchen,
//! 4) give the Kitchen slot back to the supplier,
//! 5) Counter lock: place the plate,
//! 6) Counter lock: open the meal-ready gate if the rule allows.
//!
//! Between 3 and 5 the plate is counted in neither region.
//! A cook retires as soon as a slot claim fails; it does not wait for plates
//! other cooks are still carrying.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ReadyRule;
use crate::counter::Counter;
use crate::error::CanteenError;
use crate::kitchen::{Kitchen, SlotClaim};
use crate::metrics::RunCounters;
use crate::sync::Shutdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CookSummary {
    pub id: usize,
    pub plates_served: u64,
}

pub struct Cook {
    id: usize,
    kitchen: Arc<Kitchen>,
    counter: Arc<Counter>,
    rule: ReadyRule,
    counters: RunCounters,
    shutdown: Shutdown,
}

impl Cook {
    pub fn new(
        id: usize,
        kitchen: Arc<Kitchen>,
        counter: Arc<Counter>,
        rule: ReadyRule,
        counters: RunCounters,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            id,
            kitchen,
            counter,
            rule,
            counters,
            shutdown,
        }
    }

    pub async fn run(self) -> Result<CookSummary, CanteenError> {
        let id = self.id;
        let mut plates_served = 0u64;

        loop {
            let (slot, plate) = match self.kitchen.claim_slot() {
                SlotClaim::Assigned {
                    slot,
                    plate,
                    before,
                } => {
                    info!(
                        cook = id,
                        slot,
                        kitchen = %before.tray,
                        "Cook {id} going to the kitchen to wait for/get a plate"
                    );
                    (slot, plate)
                }
                SlotClaim::Exhausted => break,
            };
            RunCounters::bump(&self.counters.slots_claimed);

            self.kitchen.ready_gate(plate).wait(&self.shutdown).await?;
            self.kitchen.plate_produced().wait(&self.shutdown).await?;

            {
                let mut kitchen = self.kitchen.lock();
                let counter = self.counter.lock();
                kitchen.tray.remove(plate);
                debug_assert!(kitchen.tray.get(plate) >= 0, "kitchen {plate} went negative");

                info!(
                    cook = id,
                    plate = %plate,
                    counter = %counter.tray,
                    "Cook {id} is going to the counter to deliver {plate}"
                );
            }
            self.kitchen.free_slots().signal();

            let placed = self.counter.place(plate);
            info!(
                cook = id,
                plate = %plate,
                counter = %placed.tray,
                "Cook {id} placed {plate} on the counter"
            );
            RunCounters::bump(&self.counters.plates_transferred);
            plates_served += 1;

            if self.counter.is_crowded(&placed) {
                warn!(
                    cook = id,
                    counter = %placed.tray,
                    "counter holds more plates than the threshold"
                );
                RunCounters::bump(&self.counters.threshold_warnings);
            }

            if self.counter.signal_if_meal_ready(self.rule) {
                debug!(cook = id, slot, "meal ready");
                RunCounters::bump(&self.counters.meal_signals);
            }
        }

        let left = self.kitchen.snapshot().tray.total();
        info!(
            cook = id,
            plates_served,
            kitchen_items = left,
            "Cook {id} finished serving - items at kitchen: {left} - going home - GOODBYE!!!"
        );

        Ok(CookSummary { id, plates_served })
    }
}
