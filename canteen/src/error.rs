use thiserror::Error;

/// Failures an actor can hit while running the protocol.
#[derive(Error, Debug)]
pub enum CanteenError {
    #[error("invalid plate type {symbol:?} at input position {position}")]
    InvalidPlate { symbol: char, position: u64 },

    #[error("input exhausted after {produced} of {target} plates")]
    InputExhausted { produced: u64, target: u64 },

    #[error("input stream failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cancelled by shutdown")]
    Cancelled,

    #[error("run interrupted")]
    Interrupted,

    #[error("actor task failed: {0}")]
    TaskPanicked(String),
}

impl CanteenError {
    /// True for the error actors return when they were unblocked by a shutdown
    /// rather than failing on their own.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CanteenError::Cancelled)
    }
}

/// Every run parameter constraint that did not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid run configuration: {}", .violations.join("; "))]
pub struct ConfigError {
    pub violations: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shutdown_wakeups_count_as_cancellation() {
        assert!(CanteenError::Cancelled.is_cancellation());
        assert!(!CanteenError::Interrupted.is_cancellation());
        assert!(
            !CanteenError::InvalidPlate {
                symbol: 'X',
                position: 0
            }
            .is_cancellation()
        );
    }

    #[test]
    fn config_error_lists_every_violation() {
        let err = ConfigError {
            violations: vec!["N > 2", "M > T"],
        };
        assert_eq!(err.to_string(), "invalid run configuration: N > 2; M > T");
    }
}
