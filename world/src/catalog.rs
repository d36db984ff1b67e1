//! Unit statistics used by the reference arena.

use breachline_core::{Coord, MobileKind, StationaryKind, UnitKind};
use serde::{Deserialize, Serialize};

/// Prices and turret statistics of the reference arena.
///
/// Missing fields fall back to the values of [`UnitCatalog::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitCatalog {
    /// Core price of a filter.
    pub filter_cost: f32,
    /// Core price of an encryptor.
    pub encryptor_cost: f32,
    /// Core price of a destructor.
    pub destructor_cost: f32,
    /// Bit price of a ping.
    pub ping_cost: f32,
    /// Bit price of an EMP.
    pub emp_cost: f32,
    /// Bit price of a scrambler.
    pub scrambler_cost: f32,
    /// Euclidean reach of a destructor, in cells.
    pub turret_range: f32,
    /// Damage a destructor deals per shot.
    pub turret_damage: u32,
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self {
            filter_cost: 1.0,
            encryptor_cost: 4.0,
            destructor_cost: 3.0,
            ping_cost: 1.0,
            emp_cost: 3.0,
            scrambler_cost: 1.0,
            turret_range: 3.0,
            turret_damage: 4,
        }
    }
}

impl UnitCatalog {
    /// Price of a single unit of the provided type.
    #[must_use]
    pub fn cost(&self, kind: UnitKind) -> f32 {
        match kind {
            UnitKind::Stationary(StationaryKind::Filter) => self.filter_cost,
            UnitKind::Stationary(StationaryKind::Encryptor) => self.encryptor_cost,
            UnitKind::Stationary(StationaryKind::Destructor) => self.destructor_cost,
            UnitKind::Mobile(MobileKind::Ping) => self.ping_cost,
            UnitKind::Mobile(MobileKind::Emp) => self.emp_cost,
            UnitKind::Mobile(MobileKind::Scrambler) => self.scrambler_cost,
        }
    }

    /// Reports whether a turret at `turret` reaches `cell`.
    #[must_use]
    pub fn turret_reaches(&self, turret: Coord, cell: Coord) -> bool {
        let reach = f64::from(self.turret_range.max(0.0));
        turret.distance_squared(cell) as f64 <= reach * reach
    }
}
