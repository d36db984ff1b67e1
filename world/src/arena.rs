//! Geometry of the diamond-shaped arena.

use breachline_core::{Coord, ARENA_SIZE, HALF_ARENA};

/// One of the four diagonal borders of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Upper-left border, owned by the opponent.
    TopLeft,
    /// Upper-right border, owned by the opponent.
    TopRight,
    /// Lower-left border, owned by the defender.
    BottomLeft,
    /// Lower-right border, owned by the defender.
    BottomRight,
}

impl Edge {
    /// All edges in a stable order.
    pub const ALL: [Edge; 4] = [
        Edge::TopLeft,
        Edge::TopRight,
        Edge::BottomLeft,
        Edge::BottomRight,
    ];

    /// Edge diagonally across the arena.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }

    /// Edge belonging to the quadrant that contains the cell.
    #[must_use]
    pub const fn of_quadrant(cell: Coord) -> Self {
        let left = cell.x() < HALF_ARENA;
        let bottom = cell.y() < HALF_ARENA;
        match (left, bottom) {
            (true, true) => Self::BottomLeft,
            (false, true) => Self::BottomRight,
            (true, false) => Self::TopLeft,
            (false, false) => Self::TopRight,
        }
    }

    /// Number of diagonal steps separating an in-arena cell from this edge.
    #[must_use]
    pub const fn gap(self, cell: Coord) -> i32 {
        let (x, y) = (cell.x(), cell.y());
        match self {
            Self::TopRight => (ARENA_SIZE + HALF_ARENA - 1) - (x + y),
            Self::TopLeft => HALF_ARENA - (y - x),
            Self::BottomLeft => (x + y) - (HALF_ARENA - 1),
            Self::BottomRight => HALF_ARENA - (x - y),
        }
    }

    /// Reports whether the cell lies on this edge.
    #[must_use]
    pub fn contains(self, cell: Coord) -> bool {
        contains(cell) && self.gap(cell) == 0 && Edge::of_quadrant(cell) == self
    }

    /// Cells composing the edge, ordered from the horizontal midline outward.
    #[must_use]
    pub fn cells(self) -> Vec<Coord> {
        (0..HALF_ARENA)
            .map(|i| match self {
                Self::TopLeft => Coord::new(HALF_ARENA - 1 - i, ARENA_SIZE - 1 - i),
                Self::TopRight => Coord::new(HALF_ARENA + i, ARENA_SIZE - 1 - i),
                Self::BottomLeft => Coord::new(HALF_ARENA - 1 - i, i),
                Self::BottomRight => Coord::new(HALF_ARENA + i, i),
            })
            .collect()
    }
}

/// Reports whether the cell lies inside the diamond.
#[must_use]
pub fn contains(cell: Coord) -> bool {
    let (x, y) = (cell.x(), cell.y());
    if !(0..ARENA_SIZE).contains(&y) {
        return false;
    }

    let band = if y < HALF_ARENA { y } else { ARENA_SIZE - 1 - y };
    x >= HALF_ARENA - 1 - band && x <= HALF_ARENA + band
}

/// Edge a cell sits on, if any.
#[must_use]
pub fn edge_of(cell: Coord) -> Option<Edge> {
    let edge = Edge::of_quadrant(cell);
    edge.contains(cell).then_some(edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diamond_rows_widen_toward_the_midline() {
        assert!(contains(Coord::new(13, 0)));
        assert!(contains(Coord::new(14, 0)));
        assert!(!contains(Coord::new(12, 0)));
        assert!(!contains(Coord::new(15, 0)));
        assert!(contains(Coord::new(0, 13)));
        assert!(contains(Coord::new(27, 14)));
        assert!(!contains(Coord::new(0, 12)));
        assert!(!contains(Coord::new(13, 28)));
    }

    #[test]
    fn every_edge_cell_lies_on_its_edge() {
        for edge in Edge::ALL {
            let cells = edge.cells();
            assert_eq!(cells.len(), 14);
            for cell in cells {
                assert!(contains(cell), "{cell} should be inside the arena");
                assert_eq!(edge_of(cell), Some(edge), "{cell} should sit on {edge:?}");
            }
        }
    }

    #[test]
    fn interior_cells_belong_to_no_edge() {
        assert_eq!(edge_of(Coord::new(13, 13)), None);
        assert_eq!(edge_of(Coord::new(10, 8)), None);
    }

    #[test]
    fn known_spawn_cells_sit_on_defender_edges() {
        assert_eq!(edge_of(Coord::new(4, 9)), Some(Edge::BottomLeft));
        assert_eq!(edge_of(Coord::new(22, 8)), Some(Edge::BottomRight));
        assert_eq!(edge_of(Coord::new(15, 1)), Some(Edge::BottomRight));
        assert_eq!(edge_of(Coord::new(12, 1)), Some(Edge::BottomLeft));
    }
}
