//! Blocking primitives shared by every actor.
//!
//! Region state sits behind `parking_lot::Mutex`; these types cover the
//! counting gates and the run-wide shutdown signal that every suspension
//! point races against.

pub mod gate;
pub mod shutdown;

pub use gate::Gate;
pub use shutdown::{Shutdown, ShutdownReason};
