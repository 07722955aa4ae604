use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::SemaphorePermit;

use crate::error::CanteenError;
use crate::sync::{Gate, Shutdown};

/// Fixed number of dining seats.
///
/// `seated` is raised only after a gate unit is held and lowered before it is
/// returned, so `peak_seated` can never exceed the capacity. Each held seat
/// owns a distinct table number in `1..=capacity`.
pub struct TablePool {
    seats: Gate,
    capacity: usize,
    occupied: Mutex<Vec<bool>>,
    seated: AtomicUsize,
    peak_seated: AtomicUsize,
}

impl TablePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            seats: Gate::new("tables", capacity),
            capacity,
            occupied: Mutex::new(vec![false; capacity]),
            seated: AtomicUsize::new(0),
            peak_seated: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seats not currently held.
    pub fn empty(&self) -> usize {
        self.seats.available()
    }

    pub fn seated(&self) -> usize {
        self.seated.load(Ordering::Acquire)
    }

    pub fn peak_seated(&self) -> usize {
        self.peak_seated.load(Ordering::Acquire)
    }

    /// Waits for a free seat. The seat is released when the returned guard drops.
    pub async fn sit(&self, shutdown: &Shutdown) -> Result<Seat<'_>, CanteenError> {
        let permit = self.seats.hold(shutdown).await?;
        let table = self.take_table();
        let now = self.seated.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_seated.fetch_max(now, Ordering::AcqRel);

        Ok(Seat {
            pool: self,
            table,
            _permit: permit,
        })
    }

    /// Lowest free table number. A gate unit is held, so one is always free.
    fn take_table(&self) -> usize {
        let mut occupied = self.occupied.lock();
        let idx = occupied.iter().position(|taken| !taken);
        debug_assert!(idx.is_some(), "seat held without a free table");
        let idx = idx.unwrap_or(0);
        occupied[idx] = true;
        idx + 1
    }
}

/// A held table seat.
pub struct Seat<'a> {
    pool: &'a TablePool,
    table: usize,
    _permit: SemaphorePermit<'a>,
}

impl Seat<'_> {
    /// Table number, unique among currently held seats.
    pub fn table(&self) -> usize {
        self.table
    }
}

impl Drop for Seat<'_> {
    fn drop(&mut self) {
        // Runs before `_permit` is dropped, i.e. before the seat is handed back.
        self.pool.occupied.lock()[self.table - 1] = false;
        self.pool.seated.fetch_sub(1, Ordering::AcqRel);
    }
}
