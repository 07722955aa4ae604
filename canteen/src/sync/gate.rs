use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::trace;

use crate::error::CanteenError;
use crate::sync::Shutdown;

/// Named counting resource.
///
/// `signal` adds one unit, `wait` consumes one (blocking while none are
/// free), `hold` borrows one until the returned permit is dropped.
/// Every wait races the run's [`Shutdown`]. The semaphore is never closed, so
/// shutdown is the only way a wait fails.
#[derive(Debug)]
pub struct Gate {
    name: &'static str,
    sem: Semaphore,
}

impl Gate {
    pub fn new(name: &'static str, initial: usize) -> Self {
        Self {
            name,
            sem: Semaphore::new(initial),
        }
    }

    pub fn signal(&self) {
        self.sem.add_permits(1);
    }

    /// Units currently free, i.e. not yet consumed by a waiter.
    pub fn available(&self) -> usize {
        self.sem.available_permits()
    }

    /// Consumes one unit for good.
    pub async fn wait(&self, shutdown: &Shutdown) -> Result<(), CanteenError> {
        self.hold(shutdown).await?.forget();
        Ok(())
    }

    /// Consumes one unit if one is free, without blocking.
    pub fn try_wait(&self) -> bool {
        match self.sem.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Borrows one unit; it returns to the gate when the permit drops.
    pub async fn hold(&self, shutdown: &Shutdown) -> Result<SemaphorePermit<'_>, CanteenError> {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                trace!(gate = self.name, "wait cancelled by shutdown");
                Err(CanteenError::Cancelled)
            }
            res = self.sem.acquire() => res.map_err(|_| CanteenError::Cancelled),
        }
    }
}
