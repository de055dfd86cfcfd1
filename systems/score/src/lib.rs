#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Delivery scoring.
//!
//! Folds the tick's event stream into a running delivery count. Every
//! [`Event::AnimalDelivered`] adds one point and publishes the new total as
//! [`Event::ScoreChanged`], so observers never have to count deliveries
//! themselves. The world's delivery latch guarantees at most one
//! `AnimalDelivered` per animal, which keeps the count exact.

use herdsman_core::Event;

/// Running delivery tally.
#[derive(Debug, Default)]
pub struct Score {
    total: u32,
}

impl Score {
    /// Creates a tally starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { total: 0 }
    }

    /// Folds delivery events into the tally, publishing one
    /// [`Event::ScoreChanged`] per point gained.
    pub fn handle(&mut self, events: &[Event], out_events: &mut Vec<Event>) {
        for event in events {
            if let Event::AnimalDelivered { .. } = event {
                self.total += 1;
                out_events.push(Event::ScoreChanged { total: self.total });
            }
        }
    }

    /// Clears the tally and announces the zeroed total.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.total = 0;
        out_events.push(Event::ScoreChanged { total: 0 });
    }

    /// Deliveries counted since the last reset.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }
}
