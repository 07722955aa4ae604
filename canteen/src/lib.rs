pub mod config;
pub mod cook;
pub mod counter;
pub mod kitchen;
pub mod lifecycle;
pub mod metrics;
pub mod plate;
pub mod student;
pub mod supplier;
pub mod sync;

pub mod error;

pub use config::{ClaimMode, ProtocolConfig, ReadyRule, RunConfig};
pub use error::{CanteenError, ConfigError};
pub use lifecycle::{Canteen, report::RunReport};
pub use plate::PlateType;
