//! Student: queues at the Counter, takes a complete meal, then takes and
//! frees a table seat, for a fixed number of rounds.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ClaimMode;
use crate::counter::Counter;
use crate::error::CanteenError;
use crate::metrics::RunCounters;
use crate::sync::Shutdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: usize,
    pub rounds: usize,
}

pub struct Student {
    id: usize,
    rounds: usize,
    counter: Arc<Counter>,
    claim_mode: ClaimMode,
    eat_duration: Duration,
    counters: RunCounters,
    shutdown: Shutdown,
}

impl Student {
    pub fn new(
        id: usize,
        rounds: usize,
        counter: Arc<Counter>,
        claim_mode: ClaimMode,
        eat_duration: Duration,
        counters: RunCounters,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            id,
            rounds,
            counter,
            claim_mode,
            eat_duration,
            counters,
            shutdown,
        }
    }

    pub async fn run(self) -> Result<StudentSummary, CanteenError> {
        let id = self.id;
        let tables = self.counter.tables();

        for round in 1..=self.rounds {
            let queued = self.counter.join_queue();
            info!(
                student = id,
                round,
                waiting = queued.waiting_students,
                counter = %queued.tray,
                "Student {id} is going to the counter (round {round})"
            );

            self.counter.meal_ready().wait(&self.shutdown).await?;

            let claimed = self.counter.claim_meal(self.claim_mode);
            RunCounters::bump(&self.counters.meals_claimed);
            if claimed.tray.any_negative() {
                warn!(student = id, counter = %claimed.tray, "counter observed negative after claim");
                RunCounters::bump(&self.counters.negative_observations);
            }
            info!(
                student = id,
                round,
                empty_tables = tables.empty(),
                "Student {id} got food and is going to get a table (round {round})"
            );

            let seat = tables.sit(&self.shutdown).await?;
            RunCounters::bump(&self.counters.seatings);
            info!(
                student = id,
                round,
                table = seat.table(),
                empty_tables = tables.empty(),
                "Student {id} sat at table {} to eat (round {round})",
                seat.table()
            );

            if !self.eat_duration.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => return Err(CanteenError::Cancelled),
                    _ = tokio::time::sleep(self.eat_duration) => {}
                }
            }

            let table = seat.table();
            drop(seat);
            if round < self.rounds {
                info!(
                    student = id,
                    round,
                    empty_tables = tables.empty(),
                    "Student {id} left table {table} to eat again (round {round})"
                );
            }
        }

        info!(
            student = id,
            rounds = self.rounds,
            "Student {id} is done eating {} times - going home - GOODBYE!!!",
            self.rounds
        );

        Ok(StudentSummary {
            id,
            rounds: self.rounds,
        })
    }
}
