#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative reference arena for Breachline.
//!
//! The live game runs inside an external engine. This crate provides a small,
//! deterministic stand-in that answers the same [`Board`] queries and accepts
//! the same [`Orders`], so decision systems can be exercised without the
//! engine. State changes outside of the defender's own orders go through
//! [`apply`].

mod arena;
mod catalog;
mod navigation;
mod units;

use breachline_core::{
    Board, Command, Coord, Event, MobileKind, Orders, Owner, Placement, ResourceKind,
    StationaryKind, UnitId, UnitKind, HALF_ARENA,
};
use tracing::{debug, warn};

pub use arena::{contains as in_arena, edge_of, Edge};
pub use catalog::UnitCatalog;

use navigation::SearchField;
use units::UnitRegistry;

const DEFAULT_CORES: f32 = 40.0;
const DEFAULT_BITS: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Ledger {
    cores: f32,
    bits: f32,
}

impl Ledger {
    const fn starting() -> Self {
        Self {
            cores: DEFAULT_CORES,
            bits: DEFAULT_BITS,
        }
    }

    fn balance(&self, resource: ResourceKind) -> f32 {
        match resource {
            ResourceKind::Cores => self.cores,
            ResourceKind::Bits => self.bits,
        }
    }

    fn spend(&mut self, resource: ResourceKind, amount: f32) -> bool {
        let slot = match resource {
            ResourceKind::Cores => &mut self.cores,
            ResourceKind::Bits => &mut self.bits,
        };
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }
}

/// Represents the authoritative state of the reference arena.
#[derive(Debug)]
pub struct World {
    catalog: UnitCatalog,
    units: UnitRegistry,
    defender: Ledger,
    opponent: Ledger,
    turn: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty arena using the default unit catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(UnitCatalog::default())
    }

    /// Creates an empty arena priced by the provided catalog.
    #[must_use]
    pub fn with_catalog(catalog: UnitCatalog) -> Self {
        Self {
            catalog,
            units: UnitRegistry::new(),
            defender: Ledger::starting(),
            opponent: Ledger::starting(),
            turn: 0,
        }
    }

    fn ledger_mut(&mut self, owner: Owner) -> &mut Ledger {
        match owner {
            Owner::Defender => &mut self.defender,
            Owner::Opponent => &mut self.opponent,
        }
    }

    fn build_rejection(&self, cell: Coord) -> Option<&'static str> {
        if !arena::contains(cell) {
            return Some("outside the arena");
        }
        if cell.y() >= HALF_ARENA {
            return Some("outside the defender's half");
        }
        if self.unit_count(cell) > 0 {
            return Some("cell occupied");
        }
        None
    }

    fn spawn_rejection(&self, cell: Coord) -> Option<&'static str> {
        match arena::edge_of(cell) {
            Some(Edge::BottomLeft | Edge::BottomRight) => {}
            _ => return Some("not on a defender edge"),
        }
        if self.contains_stationary(cell) {
            return Some("cell blocked by a structure");
        }
        None
    }

    fn deploy(
        &mut self,
        kind: UnitKind,
        cells: &[Coord],
        max_per_cell: u32,
        rejection: fn(&Self, Coord) -> Option<&'static str>,
    ) -> Placement {
        let cell_count = u32::try_from(cells.len()).unwrap_or(u32::MAX);
        let mut placement = Placement::new(cell_count.saturating_mul(max_per_cell), 0);
        let cost = self.catalog.cost(kind);

        for &cell in cells {
            for _ in 0..max_per_cell {
                if let Some(reason) = rejection(self, cell) {
                    debug!(?kind, %cell, reason, "placement skipped");
                    break;
                }
                if !self.defender.spend(kind.resource(), cost) {
                    debug!(?kind, %cell, "placement skipped: insufficient resources");
                    break;
                }
                let _ = self.units.insert(kind, Owner::Defender, cell);
                placement.placed += 1;
            }
        }

        placement
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceUnit { kind, owner, cell } => {
            if !arena::contains(cell) {
                warn!(%cell, ?kind, "ignoring placement outside the arena");
                return;
            }
            if kind.is_stationary() && world.contains_stationary(cell) {
                warn!(%cell, ?kind, "ignoring placement on top of a structure");
                return;
            }
            let unit = world.units.insert(kind, owner, cell);
            out_events.push(Event::Spawn {
                cell,
                kind,
                unit,
                owner,
            });
        }
        Command::RemoveUnit { unit } => {
            if let Some(state) = world.units.remove(unit) {
                out_events.push(Event::Death {
                    cell: state.cell,
                    kind: state.kind,
                    unit: state.id,
                    owner: state.owner,
                    removed_by_owner: true,
                });
            }
        }
        Command::SetResources { owner, cores, bits } => {
            let ledger = world.ledger_mut(owner);
            ledger.cores = cores;
            ledger.bits = bits;
        }
        Command::AdvanceTurn => {
            world.turn = world.turn.saturating_add(1);
        }
        Command::SetTurn { turn } => {
            world.turn = turn;
        }
    }
}

impl Board for World {
    fn in_bounds(&self, cell: Coord) -> bool {
        arena::contains(cell)
    }

    fn unit_count(&self, cell: Coord) -> usize {
        self.units.at(cell).count()
    }

    fn contains_stationary(&self, cell: Coord) -> bool {
        self.units.at(cell).any(|unit| unit.kind.is_stationary())
    }

    fn structure_at(&self, cell: Coord) -> Option<(StationaryKind, Owner)> {
        self.units.at(cell).find_map(|unit| match unit.kind {
            UnitKind::Stationary(kind) => Some((kind, unit.owner)),
            UnitKind::Mobile(_) => None,
        })
    }

    fn path_to_edge(&self, start: Coord) -> Vec<Coord> {
        let mut field = SearchField::default();
        navigation::path_to_edge(&mut field, start, |cell| self.contains_stationary(cell))
    }

    fn attackers(&self, cell: Coord, victim: Owner) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|unit| unit.owner == victim.opponent())
            .filter(|unit| unit.kind == UnitKind::Stationary(StationaryKind::Destructor))
            .filter(|unit| self.catalog.turret_reaches(unit.cell, cell))
            .map(|unit| unit.id)
            .collect()
    }

    fn turn_number(&self) -> u32 {
        self.turn
    }
}

impl Orders for World {
    fn attempt_build(
        &mut self,
        kind: StationaryKind,
        cells: &[Coord],
        max_per_cell: u32,
    ) -> Placement {
        self.deploy(kind.into(), cells, max_per_cell, Self::build_rejection)
    }

    fn attempt_spawn(
        &mut self,
        kind: MobileKind,
        cells: &[Coord],
        max_per_cell: u32,
    ) -> Placement {
        self.deploy(kind.into(), cells, max_per_cell, Self::spawn_rejection)
    }

    fn resource_balance(&self, resource: ResourceKind) -> f32 {
        self.defender.balance(resource)
    }

    fn unit_cost(&self, kind: UnitKind) -> f32 {
        self.catalog.cost(kind)
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{UnitCatalog, World};
    use breachline_core::{Coord, Owner, ResourceKind, UnitId, UnitKind};

    /// Captures every unit on the board in identifier order.
    #[must_use]
    pub fn units(world: &World) -> Vec<UnitSnapshot> {
        world.units.iter().map(UnitSnapshot::from_state).collect()
    }

    /// Captures the units standing on the provided cell.
    #[must_use]
    pub fn units_at(world: &World, cell: Coord) -> Vec<UnitSnapshot> {
        world.units.at(cell).map(UnitSnapshot::from_state).collect()
    }

    /// Reports a player's balance of the provided resource.
    #[must_use]
    pub fn resource(world: &World, owner: Owner, resource: ResourceKind) -> f32 {
        match owner {
            Owner::Defender => world.defender.balance(resource),
            Owner::Opponent => world.opponent.balance(resource),
        }
    }

    /// Provides read-only access to the unit catalog pricing the arena.
    #[must_use]
    pub fn catalog(world: &World) -> &UnitCatalog {
        &world.catalog
    }

    /// Immutable representation of a single unit used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct UnitSnapshot {
        /// Identifier allocated to the unit by the world.
        pub id: UnitId,
        /// Type of the unit.
        pub kind: UnitKind,
        /// Player that owns the unit.
        pub owner: Owner,
        /// Cell the unit occupies.
        pub cell: Coord,
    }

    impl UnitSnapshot {
        fn from_state(state: &super::units::UnitState) -> Self {
            Self {
                id: state.id,
                kind: state.kind,
                owner: state.owner,
                cell: state.cell,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(world: &mut World, kind: UnitKind, owner: Owner, cell: Coord) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::PlaceUnit { kind, owner, cell }, &mut events);
        events
    }

    #[test]
    fn ledger_refuses_overspending() {
        let mut ledger = Ledger {
            cores: 2.0,
            bits: 0.0,
        };
        assert!(ledger.spend(ResourceKind::Cores, 2.0));
        assert!(!ledger.spend(ResourceKind::Cores, 0.5));
        assert_eq!(ledger.balance(ResourceKind::Cores), 0.0);
    }

    #[test]
    fn placement_outside_arena_is_ignored() {
        let mut world = World::new();
        let events = place(
            &mut world,
            StationaryKind::Filter.into(),
            Owner::Opponent,
            Coord::new(0, 0),
        );

        assert!(events.is_empty());
        assert!(query::units(&world).is_empty());
    }

    #[test]
    fn structures_do_not_stack() {
        let mut world = World::new();
        let cell = Coord::new(13, 20);
        let first = place(&mut world, StationaryKind::Filter.into(), Owner::Opponent, cell);
        let second = place(
            &mut world,
            StationaryKind::Destructor.into(),
            Owner::Opponent,
            cell,
        );

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(world.unit_count(cell), 1);
    }

    #[test]
    fn removal_emits_death_event() {
        let mut world = World::new();
        let cell = Coord::new(14, 5);
        let events = place(&mut world, StationaryKind::Filter.into(), Owner::Defender, cell);
        let Some(Event::Spawn { unit, .. }) = events.first().cloned() else {
            panic!("expected a spawn event, got {events:?}");
        };

        let mut removal = Vec::new();
        apply(&mut world, Command::RemoveUnit { unit }, &mut removal);

        assert_eq!(
            removal,
            vec![Event::Death {
                cell,
                kind: StationaryKind::Filter.into(),
                unit,
                owner: Owner::Defender,
                removed_by_owner: true,
            }]
        );
        assert!(!world.is_occupied(cell));
    }
}
