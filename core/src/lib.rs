#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Breachline decision module.
//!
//! The game itself runs inside an external engine. This crate defines the
//! surface that connects it with the pure decision systems: the engine (or
//! the reference [`Board`] implementation in the world crate) answers
//! read-only queries, accepts best-effort [`Orders`], and delivers decoded
//! [`Event`] batches once per action frame. Systems consume those queries and
//! events and respond with build and spawn requests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells spanned by each side of the arena.
pub const ARENA_SIZE: i32 = 28;

/// First row owned by the opponent; rows below it belong to the defender.
pub const HALF_ARENA: i32 = ARENA_SIZE / 2;

/// Location of a single board cell.
///
/// Coordinates are signed so that neighbourhood offsets computed next to the
/// arena border stay representable; the engine rejects them on submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided deltas.
    ///
    /// Components saturate at the `i32` range instead of wrapping.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Squared Euclidean distance between two cells, saturating at `u64::MAX`.
    #[must_use]
    pub fn distance_squared(self, other: Coord) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coord> for [i32; 2] {
    fn from(coord: Coord) -> Self {
        [coord.x, coord.y]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Identifies which side of the match a unit or breach belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Owner {
    /// The player this module decides for. Owns rows `0..HALF_ARENA`.
    Defender,
    /// The other player.
    Opponent,
}

impl Owner {
    /// Returns the other side of the match.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Defender => Self::Opponent,
            Self::Opponent => Self::Defender,
        }
    }
}

/// Unique handle assigned to a unit by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Structures that occupy a fixed cell once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationaryKind {
    /// Cheap wall segment used to shape enemy paths.
    Filter,
    /// Support structure that shields friendly mobile units passing nearby.
    Encryptor,
    /// Turret that attacks enemy mobile units within range.
    Destructor,
}

/// Units spawned on an edge that travel toward the opposite edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobileKind {
    /// Fast, fragile scorer.
    Ping,
    /// Slow, long-range unit that attacks structures.
    Emp,
    /// Short-range interceptor that attacks mobile units.
    Scrambler,
}

/// Any unit type known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitKind {
    /// A stationary structure.
    Stationary(StationaryKind),
    /// A mobile unit.
    Mobile(MobileKind),
}

impl UnitKind {
    /// Reports whether the unit occupies its cell permanently.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Stationary(_))
    }

    /// Resource the unit is paid for with.
    #[must_use]
    pub const fn resource(self) -> ResourceKind {
        match self {
            Self::Stationary(_) => ResourceKind::Cores,
            Self::Mobile(_) => ResourceKind::Bits,
        }
    }
}

impl From<StationaryKind> for UnitKind {
    fn from(kind: StationaryKind) -> Self {
        Self::Stationary(kind)
    }
}

impl From<MobileKind> for UnitKind {
    fn from(kind: MobileKind) -> Self {
        Self::Mobile(kind)
    }
}

/// Currencies tracked by the engine's resource ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Spent on stationary structures.
    Cores,
    /// Spent on mobile units.
    Bits,
}

/// Step rules available to line scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanAxis {
    /// Both coordinates increase with every step.
    IncreasingDiagonal,
    /// Column increases while row decreases with every step.
    DecreasingDiagonal,
    /// Column increases while the row stays fixed.
    Horizontal,
}

impl ScanAxis {
    /// Row delta applied for every column step.
    #[must_use]
    pub const fn row_step(self) -> i32 {
        match self {
            Self::IncreasingDiagonal => 1,
            Self::DecreasingDiagonal => -1,
            Self::Horizontal => 0,
        }
    }

    /// Number of occupied cells a line must exceed to signal a formation.
    #[must_use]
    pub const fn threshold(self) -> u32 {
        match self {
            Self::IncreasingDiagonal | Self::DecreasingDiagonal => 6,
            Self::Horizontal => 8,
        }
    }
}

/// Straight line sampled by a scan, walked one column at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanLine {
    /// Cell the walk starts from.
    pub origin: Coord,
    /// Cell whose column ends the walk.
    pub terminus: Coord,
    /// Step rule applied between cells.
    pub axis: ScanAxis,
}

impl ScanLine {
    /// Creates a new scan line description.
    #[must_use]
    pub const fn new(origin: Coord, terminus: Coord, axis: ScanAxis) -> Self {
        Self {
            origin,
            terminus,
            axis,
        }
    }

    /// Reports whether the terminus lies on the axis drawn through the origin.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let dx = i64::from(self.terminus.x()) - i64::from(self.origin.x());
        let dy = i64::from(self.terminus.y()) - i64::from(self.origin.y());
        dy == dx * i64::from(self.axis.row_step())
    }
}

/// Events decoded from the engine's action frames.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A mobile unit reached the far edge and scored against its owner's opponent.
    Breach {
        /// Edge cell where the unit scored.
        cell: Coord,
        /// Damage dealt to the defending player's health.
        damage: f32,
        /// Type of the scoring unit.
        kind: UnitKind,
        /// Handle of the scoring unit.
        unit: UnitId,
        /// Player that owns the scoring unit.
        owner: Owner,
    },
    /// A unit entered the board.
    Spawn {
        /// Cell the unit appeared on.
        cell: Coord,
        /// Type of the spawned unit.
        kind: UnitKind,
        /// Handle assigned to the unit.
        unit: UnitId,
        /// Player that owns the unit.
        owner: Owner,
    },
    /// A unit left the board.
    Death {
        /// Cell the unit occupied when it was removed.
        cell: Coord,
        /// Type of the removed unit.
        kind: UnitKind,
        /// Handle of the removed unit.
        unit: UnitId,
        /// Player that owned the unit.
        owner: Owner,
        /// Indicates the owner removed the unit voluntarily.
        removed_by_owner: bool,
    },
}

/// Commands accepted by the reference world.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places a unit without checking resources or placement rules.
    PlaceUnit {
        /// Type of the unit to place.
        kind: UnitKind,
        /// Player that will own the unit.
        owner: Owner,
        /// Cell the unit is placed on.
        cell: Coord,
    },
    /// Removes a unit from the board.
    RemoveUnit {
        /// Handle of the unit to remove.
        unit: UnitId,
    },
    /// Overwrites a player's resource balances.
    SetResources {
        /// Player whose ledger is updated.
        owner: Owner,
        /// New core balance.
        cores: f32,
        /// New bit balance.
        bits: f32,
    },
    /// Advances the turn counter by one.
    AdvanceTurn,
    /// Sets the turn counter directly.
    SetTurn {
        /// New turn number.
        turn: u32,
    },
}

/// Ordered list of cells where the opponent's units breached the defender's edge.
///
/// The history is session-scoped: the orchestrator owns it and calls
/// [`BreachHistory::reset`] when a game starts. Within a game it grows by one
/// entry per opponent breach and is never compacted, so its memory use is
/// proportional to the number of breaches conceded during the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreachHistory {
    cells: Vec<Coord>,
}

impl BreachHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an opponent breach location.
    pub fn push(&mut self, cell: Coord) {
        self.cells.push(cell);
    }

    /// Drops every recorded breach. Called at game start.
    pub fn reset(&mut self) {
        self.cells.clear();
    }

    /// Full ordered list of recorded breaches.
    #[must_use]
    pub fn snapshot(&self) -> &[Coord] {
        &self.cells
    }

    /// Number of recorded breaches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no breach was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Requested structure placement produced by a planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildOrder {
    /// Structure to build.
    pub kind: StationaryKind,
    /// Cell the structure should occupy.
    pub cell: Coord,
}

/// Outcome of a best-effort build or spawn request.
///
/// Placing fewer units than requested is a normal outcome: the engine skips
/// cells that are occupied or unaffordable without reporting an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    /// Number of units the caller asked for.
    pub requested: u32,
    /// Number of units the engine actually placed.
    pub placed: u32,
}

impl Placement {
    /// Creates a new placement outcome.
    #[must_use]
    pub const fn new(requested: u32, placed: u32) -> Self {
        Self { requested, placed }
    }

    /// Reports whether every requested unit was placed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.placed >= self.requested
    }

    /// Reports whether some, but not all, requested units were placed.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.placed > 0 && self.placed < self.requested
    }

    /// Number of requested units that were not placed.
    #[must_use]
    pub const fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.placed)
    }

    /// Folds another outcome into this one.
    pub fn absorb(&mut self, other: Placement) {
        self.requested = self.requested.saturating_add(other.requested);
        self.placed = self.placed.saturating_add(other.placed);
    }
}

/// Read-only board queries answered by the engine.
pub trait Board {
    /// Reports whether the cell lies inside the arena.
    fn in_bounds(&self, cell: Coord) -> bool;

    /// Number of units of either player present on the cell.
    fn unit_count(&self, cell: Coord) -> usize;

    /// Reports whether any unit is present on the cell.
    fn is_occupied(&self, cell: Coord) -> bool {
        self.unit_count(cell) > 0
    }

    /// Reports whether a stationary structure occupies the cell.
    fn contains_stationary(&self, cell: Coord) -> bool;

    /// Type and owner of the structure occupying the cell, if any.
    fn structure_at(&self, cell: Coord) -> Option<(StationaryKind, Owner)>;

    /// Cells a mobile unit spawned at `start` would traverse, in order.
    fn path_to_edge(&self, start: Coord) -> Vec<Coord>;

    /// Stationary units able to attack a mobile unit of `victim` standing on the cell.
    fn attackers(&self, cell: Coord, victim: Owner) -> Vec<UnitId>;

    /// Index of the current turn, starting at zero.
    fn turn_number(&self) -> u32;
}

/// Best-effort deployment requests accepted by the engine on behalf of the defender.
pub trait Orders {
    /// Builds up to `max_per_cell` structures on each cell, in order, while affordable.
    fn attempt_build(
        &mut self,
        kind: StationaryKind,
        cells: &[Coord],
        max_per_cell: u32,
    ) -> Placement;

    /// Spawns up to `max_per_cell` mobile units on each cell, in order, while affordable.
    fn attempt_spawn(&mut self, kind: MobileKind, cells: &[Coord], max_per_cell: u32)
        -> Placement;

    /// Current balance of the requested resource.
    fn resource_balance(&self, resource: ResourceKind) -> f32;

    /// Price of a single unit of the provided type.
    fn unit_cost(&self, kind: UnitKind) -> f32;
}
