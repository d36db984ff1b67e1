//! Authoritative unit state management utilities.

use std::collections::BTreeMap;

use breachline_core::{Coord, Owner, UnitId, UnitKind};

/// Snapshot of a unit stored inside the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct UnitState {
    /// Identifier allocated by the world for the unit.
    pub(crate) id: UnitId,
    /// Type of the unit.
    pub(crate) kind: UnitKind,
    /// Player that owns the unit.
    pub(crate) owner: Owner,
    /// Cell the unit occupies.
    pub(crate) cell: Coord,
}

/// Registry that stores units and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct UnitRegistry {
    entries: BTreeMap<UnitId, UnitState>,
    next_unit_id: UnitId,
}

impl UnitRegistry {
    /// Creates an empty unit registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_unit_id: UnitId::new(0),
        }
    }

    /// Stores a new unit and returns its freshly allocated identifier.
    pub(crate) fn insert(&mut self, kind: UnitKind, owner: Owner, cell: Coord) -> UnitId {
        let id = self.next_unit_id;
        self.next_unit_id = UnitId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(
            id,
            UnitState {
                id,
                kind,
                owner,
                cell,
            },
        );
        id
    }

    /// Removes a unit, returning its last known state.
    pub(crate) fn remove(&mut self, id: UnitId) -> Option<UnitState> {
        self.entries.remove(&id)
    }

    /// Iterates every unit in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &UnitState> {
        self.entries.values()
    }

    /// Iterates the units standing on the provided cell.
    pub(crate) fn at(&self, cell: Coord) -> impl Iterator<Item = &UnitState> {
        self.entries.values().filter(move |unit| unit.cell == cell)
    }
}
