#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planner that turns breach history into structure build orders.

use breachline_core::{BreachHistory, BuildOrder, Orders, Placement, StationaryKind};
use tracing::debug;

/// Offsets around a breach cell, in submission order.
///
/// The breach cell itself is skipped so the defender's own spawn lane on the
/// edge stays open.
const NEIGHBOURHOOD: [(i32, i32); 4] = [(0, 1), (1, 1), (1, 0), (-1, 0)];

/// Planner that walls off every recorded breach with a fixed neighbourhood.
#[derive(Clone, Copy, Debug)]
pub struct ReactiveDefensePlanner {
    kind: StationaryKind,
}

impl Default for ReactiveDefensePlanner {
    fn default() -> Self {
        Self::new(StationaryKind::Destructor)
    }
}

impl ReactiveDefensePlanner {
    /// Creates a planner that answers breaches with the provided structure.
    #[must_use]
    pub const fn new(kind: StationaryKind) -> Self {
        Self { kind }
    }

    /// Structure the planner builds around breaches.
    #[must_use]
    pub const fn kind(&self) -> StationaryKind {
        self.kind
    }

    /// Emits four build orders per recorded breach, preserving history order.
    ///
    /// Orders are neither filtered nor deduplicated; the engine drops the
    /// ones that land on occupied cells or cannot be afforded.
    #[must_use]
    pub fn plan(&self, history: &BreachHistory) -> Vec<BuildOrder> {
        history
            .snapshot()
            .iter()
            .flat_map(|&breach| {
                NEIGHBOURHOOD.iter().map(move |&(dx, dy)| BuildOrder {
                    kind: self.kind,
                    cell: breach.offset(dx, dy),
                })
            })
            .collect()
    }

    /// Submits every order as an independent single-structure build attempt.
    ///
    /// Failed attempts are not retried. The returned placement aggregates the
    /// requested and placed counts over all orders.
    pub fn execute<O>(&self, orders: &[BuildOrder], engine: &mut O) -> Placement
    where
        O: Orders + ?Sized,
    {
        let mut total = Placement::default();
        for order in orders {
            total.absorb(engine.attempt_build(order.kind, &[order.cell], 1));
        }

        debug!(
            requested = total.requested,
            placed = total.placed,
            "reactive defences submitted"
        );
        total
    }
}
