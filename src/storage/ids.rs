//! Record id generation
//!
//! Ids stay time-ordered (seeded from the wall clock in milliseconds) but
//! are issued by a monotonic counter, so two creates inside the same clock
//! tick still get distinct, increasing ids.

use crate::storage::types::EntityId;
use chrono::Utc;

/// Source of the clock reading used to seed ids
pub type ClockFn = fn() -> u64;

fn wall_clock_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

fn zero_clock() -> u64 {
    0
}

/// Monotonic id generator owned by an entity store
#[derive(Debug, Clone)]
pub struct IdGenerator {
    last: u64,
    clock: ClockFn,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Generator seeded from the wall clock
    pub fn new() -> Self {
        Self::with_clock(wall_clock_millis)
    }

    /// Generator with a custom clock
    pub fn with_clock(clock: ClockFn) -> Self {
        Self { last: 0, clock }
    }

    /// Generator ignoring time: 1, 2, 3, ... (above any existing id)
    pub fn sequential() -> Self {
        Self::with_clock(zero_clock)
    }

    /// Last id handed out, 0 if none
    pub fn last_issued(&self) -> u64 {
        self.last
    }

    /// Issue an id no smaller than the clock reading and strictly greater
    /// than both the previous id and `floor` (largest id already stored)
    pub fn next_id(&mut self, floor: EntityId) -> EntityId {
        let candidate = (self.clock)()
            .max(self.last.saturating_add(1))
            .max(floor.get().saturating_add(1));
        self.last = candidate;
        EntityId(candidate)
    }
}
