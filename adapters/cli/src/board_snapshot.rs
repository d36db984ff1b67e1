//! JSON board snapshots loaded into the reference arena.

use breachline_core::{Command, Coord, Owner, UnitKind};
use breachline_world::{self as world, query, UnitCatalog, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Board state captured at the start of a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BoardSnapshot {
    /// Turn number reported by the engine.
    #[serde(default)]
    pub(crate) turn: u32,
    /// Defender's core balance.
    pub(crate) cores: f32,
    /// Defender's bit balance.
    pub(crate) bits: f32,
    /// Unit prices and turret statistics; defaults apply when omitted.
    #[serde(default)]
    pub(crate) catalog: UnitCatalog,
    /// Units on the board, in placement order.
    #[serde(default)]
    pub(crate) units: Vec<SnapshotUnit>,
}

/// Unit recorded in a board snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SnapshotUnit {
    /// Type of the unit.
    pub(crate) kind: UnitKind,
    /// Player that owns the unit.
    pub(crate) owner: Owner,
    /// Cell the unit stands on.
    pub(crate) cell: Coord,
}

impl BoardSnapshot {
    /// Parses a snapshot from its JSON text.
    pub(crate) fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Rebuilds the snapshot inside a fresh reference arena.
    ///
    /// Units the arena refuses, such as a second structure on one cell, are
    /// dropped with a warning.
    pub(crate) fn into_world(self) -> World {
        let mut world = World::with_catalog(self.catalog);
        let mut events = Vec::new();

        world::apply(&mut world, Command::SetTurn { turn: self.turn }, &mut events);
        world::apply(
            &mut world,
            Command::SetResources {
                owner: Owner::Defender,
                cores: self.cores,
                bits: self.bits,
            },
            &mut events,
        );

        for unit in &self.units {
            let before = events.len();
            world::apply(
                &mut world,
                Command::PlaceUnit {
                    kind: unit.kind,
                    owner: unit.owner,
                    cell: unit.cell,
                },
                &mut events,
            );
            if events.len() == before {
                warn!(cell = %unit.cell, kind = ?unit.kind, "snapshot unit dropped");
            }
        }

        debug!(
            turn = self.turn,
            units = query::units(&world).len(),
            "board snapshot loaded"
        );
        world
    }
}
