use tracing::{Span, field};

use super::RunId;

/// Root span for a whole run; every actor span nests under it.
pub fn run_span(name: &'static str, run_id: &RunId) -> Span {
    tracing::info_span!(
        "run",
        name = %name,
        run_id = %run_id,
        outcome = field::Empty
    )
}

/// Child span for one actor (`supplier`, `cook`, `student`) and its number.
pub fn actor_span(role: &'static str, id: usize) -> Span {
    tracing::info_span!("actor", role = %role, id = id)
}
