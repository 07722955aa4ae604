use std::sync::Arc;

use tokio::sync::watch;

/// Why the run is being torn down early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownReason {
    /// An actor returned an error.
    Failed,
    /// The operator interrupted the run.
    Interrupted,
}

/// Run-wide cancellation handle. Cloning is cheap; all clones observe the
/// same trigger.
#[derive(Clone, Debug)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Records `reason` and wakes every waiter. Only the first trigger sticks;
    /// returns whether this call was it.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        })
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.tx.borrow()
    }

    pub fn is_triggered(&self) -> bool {
        self.reason().is_some()
    }

    /// Resolves once the shutdown has been triggered, immediately if it already was.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this only returns once triggered.
        let _ = rx.wait_for(Option::is_some).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn first_reason_wins() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_triggered());

        assert!(shutdown.trigger(ShutdownReason::Failed));
        assert!(!shutdown.trigger(ShutdownReason::Interrupted));
        assert_eq!(shutdown.reason(), Some(ShutdownReason::Failed));
    }

    #[tokio::test]
    async fn wakes_waiters_in_other_tasks() {
        let shutdown = Shutdown::new();
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.cancelled().await })
        };

        tokio::task::yield_now().await;
        shutdown.trigger(ShutdownReason::Interrupted);

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
    }

    #[tokio::test]
    async fn cancelled_returns_after_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger(ShutdownReason::Failed);
        tokio::time::timeout(Duration::from_millis(100), shutdown.cancelled())
            .await
            .expect("already-triggered shutdown resolves immediately");
    }
}
