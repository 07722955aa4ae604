//! Lifecycle controller for one simulation run.
//!
//! Responsibilities:
//! - Build the Kitchen and Counter regions with their gates at starting capacity.
//! - Spawn one supplier, `N` cooks and `M` students, each in its own task.
//! - Join every task and turn the outcome into a [`RunReport`] or an error.
//!
//! Failure handling:
//! - The first actor error triggers [`ShutdownReason::Failed`]; every actor
//!   blocked on a gate wakes with `Cancelled` and exits, so a failing
//!   supplier cannot leave cooks and students hanging.
//! - The interrupt future triggers [`ShutdownReason::Interrupted`] and aborts
//!   all tasks outright.
//!
//! Regions are dropped once, after every task has been joined.

pub mod report;

use std::future::Future;
use std::sync::Arc;

use common::logger::{RunId, actor_span, run_span};
use tokio::task::JoinSet;
use tracing::{Instrument, Span, debug, error, field, info, warn};

use crate::config::RunConfig;
use crate::cook::Cook;
use crate::counter::Counter;
use crate::error::{CanteenError, ConfigError};
use crate::kitchen::Kitchen;
use crate::metrics::RunCounters;
use crate::student::Student;
use crate::supplier::{PlateSource, Supplier};
use crate::sync::{Shutdown, ShutdownReason};

use report::{ActorSummary, RunReport};

type ActorResult = Result<ActorSummary, CanteenError>;

/// Run context owning both regions, the counters and the shutdown handle.
pub struct Canteen {
    config: RunConfig,
    run_id: RunId,
    kitchen: Arc<Kitchen>,
    counter: Arc<Counter>,
    counters: RunCounters,
    shutdown: Shutdown,
}

impl Canteen {
    /// Validates `config` and allocates both regions.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let kitchen = Kitchen::new(config.production_target(), config.kitchen_capacity());
        let counter = Counter::new(config.tables, config.counter_threshold);

        Ok(Self {
            run_id: RunId::new(),
            kitchen: Arc::new(kitchen),
            counter: Arc::new(counter),
            counters: RunCounters::default(),
            shutdown: Shutdown::new(),
            config,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn kitchen(&self) -> Arc<Kitchen> {
        self.kitchen.clone()
    }

    pub fn counter(&self) -> Arc<Counter> {
        self.counter.clone()
    }

    pub fn counters(&self) -> RunCounters {
        self.counters.clone()
    }

    /// Handle that cancels the run from outside when triggered.
    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Runs to completion with no external interrupt.
    pub async fn run<S: PlateSource>(self, source: S) -> Result<RunReport, CanteenError> {
        self.run_until(source, std::future::pending::<()>()).await
    }

    /// Runs until every actor finishes, an actor fails, or `interrupt` resolves.
    pub async fn run_until<S, F>(self, source: S, interrupt: F) -> Result<RunReport, CanteenError>
    where
        S: PlateSource,
        F: Future<Output = ()>,
    {
        let span = run_span("canteen", &self.run_id);
        self.drive(source, interrupt).instrument(span).await
    }

    async fn drive<S, F>(self, source: S, interrupt: F) -> Result<RunReport, CanteenError>
    where
        S: PlateSource,
        F: Future<Output = ()>,
    {
        info!(
            cooks = self.config.cooks,
            students = self.config.students,
            tables = self.config.tables,
            counter_threshold = self.config.counter_threshold,
            rounds = self.config.rounds,
            production_target = self.config.production_target(),
            "starting canteen run"
        );

        let mut tasks = self.spawn_actors(source);
        let mut summaries = Vec::with_capacity(tasks.len());
        let mut failure: Option<CanteenError> = None;
        let mut interrupted = false;

        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                _ = &mut interrupt, if !interrupted => {
                    interrupted = true;
                    warn!("interrupt received; terminating all actors");
                    self.shutdown.trigger(ShutdownReason::Interrupted);
                    tasks.abort_all();
                }
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok(Ok(summary)) => summaries.push(summary),
                        Ok(Err(e)) if e.is_cancellation() && self.shutdown.is_triggered() => {
                            debug!(error = %e, "actor stopped by shutdown");
                        }
                        Ok(Err(e)) => self.record_failure(&mut failure, e),
                        Err(join_err) if join_err.is_cancelled() => {}
                        Err(join_err) => self.record_failure(
                            &mut failure,
                            CanteenError::TaskPanicked(join_err.to_string()),
                        ),
                    }
                }
            }
        }

        let outcome = match self.shutdown.reason() {
            Some(ShutdownReason::Interrupted) => Err(CanteenError::Interrupted),
            Some(ShutdownReason::Failed) => Err(failure.unwrap_or(CanteenError::Cancelled)),
            None => Ok(()),
        };

        if let Err(e) = outcome {
            Span::current().record("outcome", field::display(&e));
            return Err(e);
        }

        let report = RunReport::new(
            self.run_id.clone(),
            self.kitchen.snapshot(),
            self.counter.snapshot(),
            self.counters.snapshot(),
            self.counter.tables().peak_seated(),
            summaries,
        );

        Span::current().record("outcome", "completed");
        info!(
            plates_served = report.plates_served(),
            meals_served = report.counter.meals_served,
            kitchen = %report.kitchen.tray,
            counter = %report.counter.tray,
            peak_seated = report.peak_seated,
            "all actors finished"
        );

        Ok(report)
    }

    fn spawn_actors<S: PlateSource>(&self, source: S) -> JoinSet<ActorResult> {
        let mut tasks = JoinSet::new();
        let protocol = &self.config.protocol;

        let supplier = Supplier::new(
            source,
            self.kitchen.clone(),
            self.counters.clone(),
            self.shutdown.clone(),
        );
        tasks.spawn(
            async move { supplier.run().await.map(ActorSummary::Supplier) }
                .instrument(actor_span("supplier", 0)),
        );

        for id in 1..=self.config.cooks {
            let cook = Cook::new(
                id,
                self.kitchen.clone(),
                self.counter.clone(),
                protocol.ready_rule,
                self.counters.clone(),
                self.shutdown.clone(),
            );
            tasks.spawn(
                async move { cook.run().await.map(ActorSummary::Cook) }
                    .instrument(actor_span("cook", id)),
            );
        }

        for id in 1..=self.config.students {
            let student = Student::new(
                id,
                self.config.rounds,
                self.counter.clone(),
                protocol.claim_mode,
                protocol.eat_duration,
                self.counters.clone(),
                self.shutdown.clone(),
            );
            tasks.spawn(
                async move { student.run().await.map(ActorSummary::Student) }
                    .instrument(actor_span("student", id)),
            );
        }

        debug!(actors = tasks.len(), "actors spawned");
        tasks
    }

    fn record_failure(&self, failure: &mut Option<CanteenError>, e: CanteenError) {
        if failure.is_some() {
            debug!(error = %e, "additional actor failure");
            return;
        }

        error!(error = %e, "actor failed; cancelling remaining actors");
        self.shutdown.trigger(ShutdownReason::Failed);
        *failure = Some(e);
    }
}
