//! Supplier: turns the plate-symbol stream into Kitchen deliveries.
//!
//! Per delivery:
//! 1) take a free Kitchen slot (blocks while the Kitchen is full),
//! 2) read and validate one symbol,
//! 3) under the Kitchen lock store the plate and open its type gate,
//! 4) signal `plate_produced` after the lock is released.
//!
//! Stops once `total_produced` reaches the production target. An unknown
//! symbol or a stream that ends early is fatal and returned to the caller.

pub mod source;

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::CanteenError;
use crate::kitchen::Kitchen;
use crate::metrics::RunCounters;
use crate::plate::PlateType;
use crate::sync::Shutdown;

pub use source::{PlateSource, ReaderSource, ScriptedSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplierSummary {
    pub delivered: u64,
}

pub struct Supplier<S: PlateSource> {
    source: S,
    kitchen: Arc<Kitchen>,
    counters: RunCounters,
    shutdown: Shutdown,
}

impl<S: PlateSource> Supplier<S> {
    pub fn new(source: S, kitchen: Arc<Kitchen>, counters: RunCounters, shutdown: Shutdown) -> Self {
        Self {
            source,
            kitchen,
            counters,
            shutdown,
        }
    }

    pub async fn run(self) -> Result<SupplierSummary, CanteenError> {
        let Self {
            mut source,
            kitchen,
            counters,
            shutdown,
        } = self;

        let target = kitchen.target();
        let mut delivered = 0u64;
        debug!(target_plates = target, "supplier started");

        while !kitchen.is_stocked() {
            kitchen.free_slots().wait(&shutdown).await?;

            let read = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Err(CanteenError::Cancelled),
                read = source.next_symbol() => read,
            };

            let symbol = match read {
                Ok(Some(symbol)) => symbol,
                Ok(None) => {
                    error!(delivered, target_plates = target, "input ended before production target");
                    return Err(CanteenError::InputExhausted {
                        produced: delivered,
                        target,
                    });
                }
                Err(e) => {
                    error!(error = %e, "reading plate input failed");
                    return Err(e.into());
                }
            };

            let Some(plate) = PlateType::from_symbol(symbol) else {
                let symbol = symbol as char;
                error!(symbol = ?symbol, position = delivered, "invalid plate type");
                return Err(CanteenError::InvalidPlate {
                    symbol,
                    position: delivered,
                });
            };

            let before = kitchen.snapshot();
            info!(
                plate = %plate,
                kitchen = %before.tray,
                "The supplier is going to the kitchen to deliver {plate}"
            );

            let after = kitchen.deliver(plate);
            info!(
                plate = %plate,
                symbol = %plate.symbol(),
                kitchen = %after.tray,
                "The supplier delivered {plate}"
            );

            kitchen.plate_produced().signal();
            RunCounters::bump(&counters.plates_produced);
            delivered += 1;
        }

        drop(source);
        info!(delivered, "The supplier finished supplying - GOODBYE!");

        Ok(SupplierSummary { delivered })
    }
}
