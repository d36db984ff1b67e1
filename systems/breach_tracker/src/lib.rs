#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that accumulates the cells where the opponent scored against the defender.

use breachline_core::{BreachHistory, Event, Owner};
use tracing::debug;

/// Breach tracking system fed once per decoded action frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreachTracker;

impl BreachTracker {
    /// Creates a new breach tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Appends every opponent breach in the batch to the history, in event order.
    ///
    /// Breaches scored by the defender's own units and non-breach events are
    /// ignored. Repeated breaches on the same cell are kept as separate
    /// entries. Returns the number of entries appended.
    pub fn record(&self, events: &[Event], history: &mut BreachHistory) -> usize {
        let mut appended = 0;

        for event in events {
            let Event::Breach { cell, owner, .. } = event else {
                continue;
            };

            if *owner != Owner::Opponent {
                continue;
            }

            debug!(%cell, "opponent scored");
            history.push(*cell);
            appended += 1;
        }

        if appended > 0 {
            debug!(appended, total = history.len(), "breach history updated");
        }

        appended
    }
}
